//! Tests for combining the shared transforms the way a route build does

use serde_json::{json, Value};

use konofan_pipeline::transform::{
    merge_by_key, strip_zero_props, ItemRecord, TranslateOptions, TranslationEntry, TranslationTable,
};

fn table() -> TranslationTable {
    TranslationTable::from_sources(
        vec![TranslationEntry {
            id: "EQUIP_WEAPON_NAME_101".to_string(),
            text_english: Some("Chunchunmaru".to_string()),
        }],
        vec![TranslationEntry {
            id: "EQUIP_WEAPON_NAME_102".to_string(),
            text_english: Some("Wooden Staff".to_string()),
        }],
    )
}

#[test]
fn test_weapon_table_to_records() {
    let raw = json!([
        {"id": "101", "name": "EQUIP_WEAPON_NAME_101", "rarity": "4", "description": "0"},
        {"id": "102", "name": "EQUIP_WEAPON_NAME_102", "rarity": "0"}
    ]);

    let cleaned = strip_zero_props(table().translate_value(raw, TranslateOptions::default()));
    let weapons: Vec<ItemRecord> = serde_json::from_value(cleaned).unwrap();
    assert_eq!(weapons[0].name.as_deref(), Some("Chunchunmaru"));
    assert_eq!(weapons[0].description, None);
    assert_eq!(weapons[1].rarity, None);

    let icons = vec![
        ItemRecord {
            icon_path: Some("Assets/IconWeapon/Source/101.png".to_string()),
            ..ItemRecord::new("101")
        },
        ItemRecord {
            icon_path: Some("Assets/IconWeapon/Source/250.png".to_string()),
            ..ItemRecord::new("250")
        },
    ];

    let report = merge_by_key(weapons, icons);
    assert_eq!(report.only_in_base, ["102"]);
    assert_eq!(report.only_in_overlay, ["250"]);

    let out: Value = serde_json::to_value(&report.records).unwrap();
    assert_eq!(
        out,
        json!([
            {"id": "101", "name": "Chunchunmaru", "rarity": "4", "icon_path": "Assets/IconWeapon/Source/101.png"},
            {"id": "102", "name": "Wooden Staff", "icon_path": null},
            {"id": "250", "icon_path": "Assets/IconWeapon/Source/250.png"}
        ])
    );
}

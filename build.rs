use std::fs;

/// Keys every bundled config must define, as (table, key).
const REQUIRED_KEYS: &[(&str, &str)] = &[
    ("links", "label_max_len"),
    ("links", "ellipsis"),
    ("links", "new_tab"),
    ("escape", "html"),
    ("lists", "enabled"),
];

fn main() {
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    for (section, key) in REQUIRED_KEYS {
        let present = table
            .get(*section)
            .and_then(|value| value.as_table())
            .is_some_and(|section| section.contains_key(*key));
        if !present {
            panic!("default_config.toml is missing [{section}] {key}");
        }
    }
}

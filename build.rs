use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

fn main() {
    // Compiled-in defaults: mojibake table version and print layout
    println!("cargo:rerun-if-changed={}", DEFAULT_CONFIG);

    let content = fs::read_to_string(DEFAULT_CONFIG).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    for section in ["normalize", "print"] {
        if !table.get(section).is_some_and(toml::Value::is_table) {
            panic!("default_config.toml is missing the [{}] section", section);
        }
    }

    let version = table
        .get("normalize")
        .and_then(|normalize| normalize.get("table_version"))
        .and_then(toml::Value::as_integer);
    if !matches!(version, Some(v) if v >= 1) {
        panic!("default_config.toml needs a positive normalize.table_version");
    }
}

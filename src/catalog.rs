use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::Result;
use crate::conflicts::CatalogColor;

/// Read a catalog stored as a JSON array of colors
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogColor>> {
    parse_catalog(BufReader::new(File::open(path)?))
}

pub fn parse_catalog(reader: impl Read) -> Result<Vec<CatalogColor>> {
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn parses_mixed_entries() {
        let json = br##"[
            {"id": "a", "name": "Marinho", "hex": "#1F2A44"},
            {"id": "b", "name": "Areia", "lab": {"L": 80.5, "a": 2.0, "b": 14.25}},
            {"id": "c", "name": "Sem cor"}
        ]"##;
        let catalog = parse_catalog(&json[..]).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].hex.as_deref(), Some("#1F2A44"));
        assert!(catalog[1].lab.is_some());
        assert_eq!(catalog[2].resolve_lab(), None);
    }

    #[test]
    fn rejects_non_array_documents() {
        let result = parse_catalog(&br#"{"id": "a"}"#[..]);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = read_catalog(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

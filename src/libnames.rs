use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

const SKIPPED: [&str; 3] = ["Element", "LineAsym", "LibraryType"];

/// Turns a plain list of line library types, one per line, into
/// `New Linecode.<name>` declarations. Header lines and blank lines are
/// skipped and spaces are removed from names.
pub fn library_declarations(list: &str) -> Vec<String> {
    list.lines()
        .filter(|line| !SKIPPED.iter().any(|s| line.contains(s)))
        .map(|line| line.replace(' ', ""))
        .filter(|name| !name.trim().is_empty())
        .map(|name| format!("New Linecode.{}", name.trim()))
        .collect()
}

pub fn convert_library_names(input: &Path, output: &Path) -> Result<usize> {
    let list =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let decls = library_declarations(&list);

    let mut text = decls.join("\n");
    text.push('\n');
    fs::write(output, text).with_context(|| format!("writing {}", output.display()))?;

    info!("wrote {} library names to {}", decls.len(), output.display());
    Ok(decls.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_declarations() {
        let list = "Element LibraryType\nLineAsym\n AER_ABC3 1/0 AL \n\n\t\nSUB_BT_A 2 CU\n";
        assert_eq!(
            library_declarations(list),
            vec!["New Linecode.AER_ABC31/0AL", "New Linecode.SUB_BT_A2CU"]
        );
    }

    #[test]
    fn test_convert_library_names() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("Lineas.txt");
        let output = dir.path().join("libLineCode.dss");
        fs::write(&input, "LibraryType\nCU 2\n")?;
        assert_eq!(convert_library_names(&input, &output)?, 1);
        assert_eq!(fs::read_to_string(output)?, "New Linecode.CU2\n");
        Ok(())
    }
}

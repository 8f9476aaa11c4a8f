use log::{error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_equations(&self) -> Result<Vec<String>, String> {
        load_equations_from_file(&self.file_name)
    }
}

/// Loads a list of chemical equations from a text file, one equation per line.
/// Blank lines and lines starting with '#' are skipped.
pub fn load_equations_from_file(file_name: &str) -> Result<Vec<String>, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        error!("File '{}' does not exist", file_name);
        return Err(format!("File '{}' does not exist", file_name));
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };

    let reader = BufReader::new(file);
    let mut equations = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Skipping unreadable line {} of '{}': {}", i + 1, file_name, e);
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        equations.push(trimmed.to_string());
    }

    if equations.is_empty() {
        warn!("No equations found in file '{}'", file_name);
        return Err(format!("No equations found in file '{}'", file_name));
    }
    info!(
        "Loaded {} equations from file '{}'",
        equations.len(),
        file_name
    );
    Ok(equations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_equations_success() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# combustion").unwrap();
        writeln!(temp_file, "H2 + O2 = H2O").unwrap();
        writeln!(temp_file).unwrap();
        writeln!(temp_file, "   Fe + O2 = Fe2O3   ").unwrap();
        writeln!(temp_file, "  # indented comment").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        let equations = load_equations_from_file(file_path).unwrap();
        assert_eq!(equations, vec!["H2 + O2 = H2O", "Fe + O2 = Fe2O3"]);

        let loader = LoadData::new(file_path.to_string());
        assert_eq!(loader.load_equations().unwrap().len(), 2);
    }

    #[test]
    fn test_load_equations_file_not_found() {
        let result = load_equations_from_file("non_existent_file.txt");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("does not exist"));
    }

    #[test]
    fn test_load_equations_only_comments() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "# nothing here").unwrap();
        writeln!(temp_file, "").unwrap();

        let file_path = temp_file.path().to_str().unwrap();
        let result = load_equations_from_file(file_path);
        assert!(result.unwrap_err().contains("No equations found"));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

const NOTE_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// List the markdown and text files directly inside `notes_dir`.
pub fn get_note_files(notes_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if notes_dir.is_dir()
        && let Ok(entries) = fs::read_dir(notes_dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension().and_then(|e| e.to_str())
                && NOTE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
            {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

pub fn load_note_file(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_note_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("c.MD"), "c").unwrap();
        fs::write(dir.path().join("deck.csv"), "q,a").unwrap();
        fs::create_dir(dir.path().join("nested.md")).unwrap();

        let files = get_note_files(dir.path());
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.md", "c.MD"]);
    }

    #[test]
    fn test_get_note_files_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(get_note_files(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_load_note_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "## Heading\n- bullet").unwrap();
        assert_eq!(load_note_file(&path).unwrap(), "## Heading\n- bullet");
    }
}

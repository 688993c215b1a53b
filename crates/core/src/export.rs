use crate::models::RankedResult;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Copies the backing PDF of each distinct source into `output_dir`, first
/// ranked occurrence wins. Best effort: results whose file is gone are
/// skipped and do not block the rest. Returns how many distinct files
/// were copied.
pub fn copy_matched_sources(results: &[RankedResult], output_dir: &Path) -> usize {
    if results.is_empty() {
        return 0;
    }

    if fs::create_dir_all(output_dir).is_err() {
        return 0;
    }

    let mut copied = HashSet::new();
    for result in results {
        if copied.contains(result.source.as_str()) {
            continue;
        }

        let backing = Path::new(&result.path);
        if !backing.is_file() {
            continue;
        }

        if fs::copy(backing, output_dir.join(&result.source)).is_ok() {
            copied.insert(result.source.clone());
        }
    }

    copied.len()
}

#[cfg(test)]
mod tests {
    use super::copy_matched_sources;
    use crate::models::RankedResult;
    use std::fs;
    use tempfile::tempdir;

    fn ranked(source: &str, path: &str, score: f64) -> RankedResult {
        RankedResult {
            score,
            source: source.to_string(),
            page: 1,
            path: path.to_string(),
        }
    }

    #[test]
    fn each_source_is_copied_once() -> Result<(), Box<dyn std::error::Error>> {
        let library = tempdir()?;
        let out = tempdir()?;
        let pdf = library.path().join("notes.pdf");
        fs::write(&pdf, b"%PDF-1.4\n%fake")?;

        let path = pdf.to_string_lossy().to_string();
        let results = vec![
            ranked("notes.pdf", &path, 0.9),
            ranked("notes.pdf", &path, 0.7),
        ];

        let copied = copy_matched_sources(&results, out.path());

        assert_eq!(copied, 1);
        assert!(out.path().join("notes.pdf").is_file());
        Ok(())
    }

    #[test]
    fn missing_backing_files_are_skipped_silently() -> Result<(), Box<dyn std::error::Error>> {
        let library = tempdir()?;
        let out = tempdir()?;
        let pdf = library.path().join("real.pdf");
        fs::write(&pdf, b"%PDF-1.4\n%fake")?;

        let results = vec![
            ranked("gone.pdf", "/nowhere/gone.pdf", 0.9),
            ranked("real.pdf", &pdf.to_string_lossy(), 0.8),
        ];

        let copied = copy_matched_sources(&results, out.path());

        assert_eq!(copied, 1);
        assert!(out.path().join("real.pdf").is_file());
        assert!(!out.path().join("gone.pdf").exists());
        Ok(())
    }

    #[test]
    fn a_later_occurrence_can_still_copy_the_source() -> Result<(), Box<dyn std::error::Error>> {
        let library = tempdir()?;
        let out = tempdir()?;
        let pdf = library.path().join("notes.pdf");
        fs::write(&pdf, b"%PDF-1.4\n%fake")?;

        let results = vec![
            ranked("notes.pdf", "/stale/notes.pdf", 0.9),
            ranked("notes.pdf", &pdf.to_string_lossy(), 0.6),
        ];

        let copied = copy_matched_sources(&results, out.path());

        assert_eq!(copied, 1);
        assert!(out.path().join("notes.pdf").is_file());
        Ok(())
    }

    #[test]
    fn existing_exports_are_overwritten() -> Result<(), Box<dyn std::error::Error>> {
        let library = tempdir()?;
        let out = tempdir()?;
        let pdf = library.path().join("notes.pdf");
        fs::write(&pdf, b"%PDF-1.4\n%fresh")?;
        fs::write(out.path().join("notes.pdf"), b"old copy")?;

        let results = vec![ranked("notes.pdf", &pdf.to_string_lossy(), 0.9)];
        let copied = copy_matched_sources(&results, out.path());

        assert_eq!(copied, 1);
        assert_eq!(fs::read(out.path().join("notes.pdf"))?, b"%PDF-1.4\n%fresh");
        Ok(())
    }

    #[test]
    fn no_results_means_no_output_directory() -> Result<(), Box<dyn std::error::Error>> {
        let out = tempdir()?;
        let target = out.path().join("never_created");

        let copied = copy_matched_sources(&[], &target);

        assert_eq!(copied, 0);
        assert!(!target.exists());
        Ok(())
    }
}

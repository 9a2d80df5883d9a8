//! Constant-case conversion engine.
//!
//! Renames `const` identifiers to UPPER_SNAKE_CASE across a source tree:
//! 1. Phase 1 walks the tree and builds a mapping of every mixed-case
//!    const name to its canonical form
//! 2. Phase 2 re-walks the tree and applies every mapping as a whole-word
//!    substitution, writing files back only when content changed
//!
//! The two phases are deliberately separate passes: a constant declared in
//! one file and referenced in another must be renamed consistently
//! everywhere, which a single rename-as-you-go pass would miss.

use crate::core::case;
use crate::log_status;
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Types
// ============================================================================

/// Directory segments that hold build artifacts, excluded at any depth.
const BUILD_OUTPUT_DIRS: &[&str] = &["obj", "bin"];

/// Lexical pattern for a const declaration: keyword, type expression,
/// identifier, `=`. Capture group 1 is the identifier. No real parsing —
/// this is intentionally a pattern match, kept compatible across rewrites.
const DECLARATION_PATTERN: &str = r"\bconst\s+[a-zA-Z<>\[\]]+\s+([A-Za-z][A-Za-z0-9]*)\s*=";

/// Suffix appended to a modified file's name for its backup copy.
const BACKUP_SUFFIX: &str = "bak";

/// Options for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Root of the tree to scan.
    pub root: PathBuf,
    /// Source file extension to include (without the dot).
    pub extension: String,
    /// Write a `.bak` copy of the original beside each modified file.
    pub backup: bool,
}

impl ConvertOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ConvertOptions {
            root: root.into(),
            extension: "cs".to_string(),
            backup: true,
        }
    }
}

/// One discovered rename, original const name to its canonical form.
#[derive(Debug, Clone, Serialize)]
pub struct CaseMapping {
    pub original: String,
    pub converted: String,
}

/// The complete original → converted mapping discovered in phase 1.
/// Built once per run, read-only during phase 2.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: BTreeMap<String, String>,
}

impl MappingTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn mappings(&self) -> Vec<CaseMapping> {
        self.entries
            .iter()
            .map(|(original, converted)| CaseMapping {
                original: original.clone(),
                converted: converted.clone(),
            })
            .collect()
    }

    fn record(&mut self, original: &str) {
        if case::is_upper_snake(original) {
            return;
        }
        let converted = case::to_upper_snake(original);
        if converted != original {
            // Duplicate declarations collapse; conversion is deterministic
            // so first-seen and last-seen are equivalent.
            self.entries.insert(original.to_string(), converted);
        }
    }
}

/// A file that could not be processed, with the reason. The run continues
/// past these.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file: String,
    pub error: String,
}

/// Outcome of the phase-1 scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub table: MappingTable,
    pub skipped: Vec<SkippedFile>,
}

/// Per-file rewrite report. `replacements` counts mappings whose key
/// appeared at least once in the original content, not individual
/// occurrences — a preserved reporting quirk, not an exact count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub replacements: usize,
}

/// Outcome of the phase-2 rewrite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReport {
    pub files_changed: usize,
    pub total_replacements: usize,
    pub reports: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
}

/// Full result of a conversion run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResult {
    pub mappings: Vec<CaseMapping>,
    pub files_changed: usize,
    pub total_replacements: usize,
    pub reports: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
}

// ============================================================================
// File walking
// ============================================================================

/// Enumerate source files under `root` with the given extension, excluding
/// anything under a build-output directory segment at any depth.
pub fn walk_source_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk_recursive(root, extension, &mut files);
    files
}

fn walk_recursive(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if BUILD_OUTPUT_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_recursive(&path, extension, files);
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

// ============================================================================
// Phase 1: mapping
// ============================================================================

/// Scan every eligible file for const declarations and build the complete
/// rename table. Unreadable files are recorded and skipped; the scan
/// continues.
pub fn build_mapping_table(options: &ConvertOptions) -> ScanReport {
    let declaration = Regex::new(DECLARATION_PATTERN).unwrap();

    let mut table = MappingTable::default();
    let mut skipped = Vec::new();

    for path in walk_source_files(&options.root, &options.extension) {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                let file = relative_display(&path, &options.root);
                log_status!("constants", "Warning: error reading {}: {}", file, e);
                skipped.push(SkippedFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };

        for caps in declaration.captures_iter(&content) {
            if let Some(name) = caps.get(1) {
                table.record(name.as_str());
            }
        }
    }

    ScanReport { table, skipped }
}

// ============================================================================
// Phase 2: rewriting
// ============================================================================

struct CompiledMapping {
    pattern: Regex,
    converted: String,
}

/// Compile each mapping key into a whole-word matcher. `\b` keeps
/// `Foo` from touching `FooBar`, `MyFoo`, or `Foo_` compounds.
fn compile_mappings(table: &MappingTable) -> Vec<CompiledMapping> {
    table
        .iter()
        .map(|(original, converted)| CompiledMapping {
            pattern: Regex::new(&format!(r"\b{}\b", regex::escape(original))).unwrap(),
            converted: converted.to_string(),
        })
        .collect()
}

/// Apply every mapping to `content`, returning the rewritten content and
/// the number of mapping keys that matched at least once.
fn apply_mappings(content: &str, compiled: &[CompiledMapping]) -> (String, usize) {
    let mut modified = content.to_string();
    let mut keys_matched = 0;

    for mapping in compiled {
        if mapping.pattern.is_match(&modified) {
            modified = mapping
                .pattern
                .replace_all(&modified, NoExpand(&mapping.converted))
                .to_string();
        }
        if mapping.pattern.is_match(content) {
            keys_matched += 1;
        }
    }

    (modified, keys_matched)
}

fn backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}", file_name, BACKUP_SUFFIX))
}

/// Re-walk the tree and apply the mapping table to every eligible file.
/// Files are only written after their full new content is computed, so a
/// failed read or write never leaves a partially-rewritten file.
pub fn rewrite_tree(options: &ConvertOptions, table: &MappingTable) -> RewriteReport {
    let compiled = compile_mappings(table);

    let mut reports = Vec::new();
    let mut skipped = Vec::new();
    let mut files_changed = 0;
    let mut total_replacements = 0;

    for path in walk_source_files(&options.root, &options.extension) {
        let file = relative_display(&path, &options.root);

        let original = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log_status!("constants", "✗ {}: {}", file, e);
                skipped.push(SkippedFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let (modified, keys_matched) = apply_mappings(&original, &compiled);
        if modified == original {
            continue;
        }

        if options.backup {
            if let Err(e) = fs::write(backup_path(&path), &original) {
                log_status!("constants", "✗ {}: backup failed: {}", file, e);
                skipped.push(SkippedFile {
                    file,
                    error: format!("backup failed: {}", e),
                });
                continue;
            }
        }

        if let Err(e) = fs::write(&path, &modified) {
            log_status!("constants", "✗ {}: {}", file, e);
            skipped.push(SkippedFile {
                file,
                error: e.to_string(),
            });
            continue;
        }

        log_status!("constants", "✓ {} ({} replacements)", file, keys_matched);
        files_changed += 1;
        total_replacements += keys_matched;
        reports.push(FileReport {
            file,
            replacements: keys_matched,
        });
    }

    RewriteReport {
        files_changed,
        total_replacements,
        reports,
        skipped,
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run both phases: build the mapping table, then rewrite the tree.
/// An empty table ends the run early with no rewrite phase — not an error.
pub fn convert(options: &ConvertOptions) -> ConvertResult {
    log_status!("constants", "Phase 1: scanning for const declarations...");
    let scan = build_mapping_table(options);
    log_status!(
        "constants",
        "Found {} const fields to convert",
        scan.table.len()
    );

    if scan.table.is_empty() {
        return ConvertResult {
            mappings: Vec::new(),
            files_changed: 0,
            total_replacements: 0,
            reports: Vec::new(),
            skipped: scan.skipped,
        };
    }

    log_status!("constants", "Phase 2: applying conversions to all files...");
    let rewrite = rewrite_tree(options, &scan.table);

    let mut skipped = scan.skipped;
    skipped.extend(rewrite.skipped);

    ConvertResult {
        mappings: scan.table.mappings(),
        files_changed: rewrite.files_changed,
        total_replacements: rewrite.total_replacements,
        reports: rewrite.reports,
        skipped,
    }
}

// ============================================================================
// Tests
// ============================================================================

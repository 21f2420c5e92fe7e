/*!
 * Structural checks on a manifest in its JSON form, so manifests read back from disk
 * can be checked as well as freshly built ones.
 */

use serde_json::Value;

/// Keys every manifest must carry
pub const REQUIRED_FIELDS: [&str; 4] = ["scriptureId", "scriptureName", "totalChapters", "sections"];

/// Outcome of `validate_manifest`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub passed: bool,
    // @field: One line per problem found
    pub diagnostics: Vec<String>,
    pub with_metadata: usize,
    pub without_metadata: usize,
}

/// Check required keys, non-empty sections and chapter counts.
/// Per-section `chapterCount` is compared with the chapter list only when `check_counts` is set.
pub fn validate_manifest(manifest: &Value, check_counts: bool) -> ValidationReport {
    let mut report = ValidationReport::default();

    let object = match manifest.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => {
            report.diagnostics.push("Manifest is empty or not an object".to_string());
            return report;
        }
    };

    let missing: Vec<_> = REQUIRED_FIELDS.iter().filter(|f| !object.contains_key(**f)).collect();
    if !missing.is_empty() {
        for field in missing {
            report.diagnostics.push(format!("Missing required field: {}", field));
        }
        return report;
    }

    let sections = match object["sections"].as_array() {
        Some(sections) if !sections.is_empty() => sections,
        Some(_) => {
            report.diagnostics.push("No sections found in manifest".to_string());
            return report;
        }
        None => {
            report.diagnostics.push("Field `sections` is not a list".to_string());
            return report;
        }
    };

    // None once the declared counts no longer fit in a u64
    let mut declared_sum = Some(0u64);
    for (index, section) in sections.iter().enumerate() {
        let label = section
            .get("sectionId")
            .map(|id| id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string()))
            .unwrap_or_else(|| format!("#{}", index + 1));

        let chapters = section.get("chapters").and_then(Value::as_array);
        let declared = section.get("chapterCount").and_then(Value::as_u64);

        match (declared, chapters) {
            (Some(declared), Some(chapters)) => {
                if let Some(sum) = declared_sum {
                    declared_sum = sum.checked_add(declared);
                    if declared_sum.is_none() {
                        report.diagnostics.push(format!(
                            "Section {}: chapterCount {} overflows the running chapter total",
                            label, declared
                        ));
                    }
                }
                if check_counts && declared != chapters.len() as u64 {
                    report.diagnostics.push(format!(
                        "Section {}: chapterCount is {} but {} chapters are listed",
                        label, declared, chapters.len()
                    ));
                }
            }
            (None, _) => report.diagnostics.push(format!("Section {}: missing or invalid chapterCount", label)),
            (_, None) => report.diagnostics.push(format!("Section {}: missing chapters list", label)),
        }

        for chapter in chapters.into_iter().flatten() {
            if chapter.get("hasMetadata").and_then(Value::as_bool).unwrap_or(false) {
                report.with_metadata += 1;
            } else {
                report.without_metadata += 1;
            }
        }
    }

    match (object["totalChapters"].as_u64(), declared_sum) {
        (Some(_), None) => {}
        (Some(total), Some(declared_sum)) if total == declared_sum => {}
        (Some(total), Some(declared_sum)) => report.diagnostics.push(format!(
            "totalChapters is {} but section chapter counts sum to {}",
            total, declared_sum
        )),
        (None, _) => report.diagnostics.push("Field `totalChapters` is not a non-negative integer".to_string()),
    }

    report.passed = report.diagnostics.is_empty();
    report
}

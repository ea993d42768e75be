use super::schema::FieldId;

pub const DEPLOY_STEPS: [&str; 5] = [
    "Open the destination Google Spreadsheet.",
    "Choose Extensions > Apps Script.",
    "Delete the existing code and paste the script.",
    "Choose Deploy > New deployment.",
    "Select type Web app with access Anyone, then copy the /exec URL into Settings.",
];

/// Apps Script source for the destination web app. It appends one row per
/// record in field order and answers `Success` or `Error: <message>`, which is
/// what the submission client expects.
pub fn apps_script_source() -> String {
    let columns = FieldId::ALL
        .iter()
        .map(|id| {
            let value = format!("(item.{} || \"\")", id.key());
            if id.definition().force_text {
                format!("        \"'\" + {value}")
            } else {
                format!("        {value}")
            }
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let header = FieldId::ALL
        .iter()
        .map(|id| format!("\"{}\"", id.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"/**
 * Receiver for PIP SMAK/SMTK submissions.
 * Paste into Extensions > Apps Script of the destination spreadsheet.
 */
var HEADER = [{header}];

function doPost(e) {{
  try {{
    var sheet = SpreadsheetApp.getActiveSpreadsheet().getActiveSheet();
    if (sheet.getLastRow() === 0) {{
      sheet.appendRow(HEADER);
    }}
    var contents = JSON.parse(e.postData.contents);
    var data = Array.isArray(contents) ? contents : [contents];

    data.forEach(function(item) {{
      sheet.appendRow([
{columns}
      ]);
    }});
    return ContentService.createTextOutput("Success").setMimeType(ContentService.MimeType.TEXT);
  }} catch (err) {{
    return ContentService.createTextOutput("Error: " + err.message).setMimeType(ContentService.MimeType.TEXT);
  }}
}}

function doGet() {{
  return HtmlService.createHtmlOutput("API PIP Satuan Pendidikan Keagamaan Kristen Aktif.");
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_follow_field_order() {
        let script = apps_script_source();
        let positions: Vec<usize> = FieldId::ALL
            .iter()
            .map(|id| script.find(&format!("item.{} ", id.key())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_identifiers_are_forced_to_text() {
        let script = apps_script_source();
        assert!(script.contains("\"'\" + (item.nik || \"\")"));
        assert!(script.contains("\"'\" + (item.noRekening || \"\")"));
        assert!(!script.contains("\"'\" + (item.nominal || \"\")"));
        assert!(script.contains("        (item.nominal || \"\")"));
    }

    #[test]
    fn test_replies_match_submission_markers() {
        let script = apps_script_source();
        assert!(script.contains("createTextOutput(\"Success\")"));
        assert!(script.contains("\"Error: \" + err.message"));
        assert!(script.contains("\"NIK (16 Digit)\", \"NISN (10 Digit)\""));
    }
}

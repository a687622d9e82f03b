/// Native file pickers and message boxes
///
/// These block the UI thread while open, like any modal dialog.
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::{Path, PathBuf};

use crate::pdf::export::{ExportKind, ExportSummary};

const OPEN_FOLDER: &str = "Open Folder";

pub fn pick_pdfs() -> Option<Vec<PathBuf>> {
    FileDialog::new()
        .set_title("Select PDF Files")
        .add_filter("PDF files", &["pdf", "PDF"])
        .pick_files()
}

pub fn pick_folder() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Folder with PDF Files")
        .pick_folder()
}

pub fn save_merged() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Save Merged PDF")
        .add_filter("PDF files", &["pdf"])
        .set_file_name("output.pdf")
        .save_file()
}

/// Ask for a split target. Returns the output directory and file prefix.
pub fn save_split() -> Option<(PathBuf, String)> {
    FileDialog::new()
        .set_title("Split PDF: Choose Folder and Prefix")
        .add_filter("PDF files", &["pdf"])
        .set_file_name("output_split.pdf")
        .save_file()
        .and_then(|path| split_target(&path))
}

/// "/out/report.pdf" becomes ("/out", "report")
pub fn split_target(path: &Path) -> Option<(PathBuf, String)> {
    let prefix = path.file_stem()?.to_string_lossy().into_owned();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Some((dir, prefix))
}

pub fn warn_nothing_to_export() {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Error")
        .set_description("No pages to export!")
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn show_error(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Report a finished export. Returns true when the user asked to open the
/// destination folder.
pub fn confirm_done(summary: &ExportSummary) -> bool {
    let result = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Done")
        .set_description(done_message(summary))
        .set_buttons(MessageButtons::OkCancelCustom(OPEN_FOLDER.to_string(), "OK".to_string()))
        .show();

    matches!(result, MessageDialogResult::Custom(ref label) if label == OPEN_FOLDER)
}

pub fn done_message(summary: &ExportSummary) -> String {
    match summary.kind {
        ExportKind::Merged => format!(
            "Merged {} pages into:\n{}",
            summary.pages,
            summary.destination.display()
        ),
        ExportKind::Split => format!(
            "Wrote {} files to:\n{}",
            summary.files,
            summary.destination.display()
        ),
    }
}

//! Opens each kind of dialog in turn and prints the result.
//!
//! Run with `RUST_LOG=native_file_selector=debug` to see what gets configured.

use native_file_selector::{DialogOutcome, FileSelector, logging};

fn report(label: &str, outcome: DialogOutcome) {
    match outcome {
        DialogOutcome::Selected(path) => println!("{label}: {}", path.display()),
        DialogOutcome::Cancelled => println!("{label}: cancelled"),
        DialogOutcome::Failed(err) => println!("{label}: failed ({err})"),
    }
}

fn main() -> Result<(), native_file_selector::SelectorError> {
    logging::init_tracing();

    let mut selector = FileSelector::new();
    let images = selector.register_file_extension("Image files", &["jpg", "png"])?;
    let text = selector.register_extension("Text files", "*.txt;*.md", "txt")?;

    report("open", selector.show_file_open(&[images, text]));
    report("folder", selector.show_folder_open());
    report("save", selector.show_file_save(Some(images), "photo"));
    Ok(())
}

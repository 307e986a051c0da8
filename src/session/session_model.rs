/// Session lifecycle. `AwaitingFieldValue` means a selection is active and
/// the cursor points at a field waiting for spoken input; everything else
/// funnels through `Listening`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Inactive,
    Listening,
    AwaitingFieldValue,
}

pub const GREETING: &str = "Welcome to the voice assistant. Say summary for a page overview, \
or say fill the form to list the blanks and start filling.";

pub const NO_CATCH: &str = "Sorry, I did not catch that. Please try again.";

pub const DECLINE_ACK: &str =
    "Okay. Say summary for an overview or fill the form anytime.";

pub const NAV_OPTIONS: &str = "Say a number like field 1, or say a field name to select. \
You can say repeat, skip, back, or cancel during entry.";

pub const CANCELED: &str = "Canceled filling. Say fill the form to hear the blanks again \
or summary for a page overview.";

pub const COMPLETED: &str = "All selected fields have been handled. Do you want to fill \
another field? Say a number like field 2, a field name, or say summary.";

pub const OUT_OF_RANGE: &str = "That number is out of range. Try again.";

pub const HELP: &str = "Say summary for a page overview or fill the form to list blanks. \
You can also say field 1 or a field name.";

pub const NO_FIELDS: &str = "I don't see any fillable fields on this page.";

pub const RECOGNITION_UNAVAILABLE: &str =
    "Speech recognition is not available in this environment.";

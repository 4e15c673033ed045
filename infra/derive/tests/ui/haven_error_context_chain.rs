use haven_derive::haven_error;
use std::borrow::Cow;

#[haven_error]
pub enum ManifestError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, ManifestError> {
    raw.parse::<u32>().context("reading container index")
}

fn main() {
    let err = parse("x").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (reading container index): "));

    let rewrapped: Result<u32, ManifestError> = Err(err);
    let err = rewrapped.context("second pass").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (second pass): "));
}

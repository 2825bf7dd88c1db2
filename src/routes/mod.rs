mod appointments;
mod reminders;
mod requests;

pub use appointments::*;
pub use reminders::*;
pub use requests::*;

#[get("/health_check")]
pub async fn health_check() {}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

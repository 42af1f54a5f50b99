use color_eyre::eyre::Result;

/// Installs `color_eyre` reports and routes panics through `tracing` before the
/// default hook prints them.
pub fn install_hooks() -> Result<()> {
    color_eyre::install()?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("panic: {}", panic_info);
        hook(panic_info);
    }));
    Ok(())
}

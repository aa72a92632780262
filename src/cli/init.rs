use crate::error::{CaixaError, Result};
use crate::settings::{load_settings, normalize_api_url, save_settings, settings_path};

pub fn run(api_url: &str, registers: Option<u32>, timeout: Option<u64>) -> Result<()> {
    let mut settings = load_settings();
    settings.api_url = normalize_api_url(api_url)?;
    if let Some(n) = registers {
        if n == 0 {
            return Err(CaixaError::Settings("--registers must be at least 1".to_string()));
        }
        settings.registers = n;
    }
    if let Some(t) = timeout {
        settings.timeout_secs = t.max(1);
    }
    save_settings(&settings)?;

    println!("API URL:    {}", settings.api_url);
    println!("Registers:  {}", settings.registers);
    println!("Timeout:    {}s", settings.timeout_secs);
    println!("Saved to {}", settings_path().display());
    Ok(())
}

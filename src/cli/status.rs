use colored::Colorize;

use crate::cli::Context;
use crate::error::Result;
use crate::settings::settings_path;

pub fn run(ctx: &Context) -> Result<()> {
    let path = settings_path();
    println!(
        "Settings:   {}{}",
        path.display(),
        if path.exists() { "" } else { " (not found, using defaults)" }
    );
    println!("API URL:    {}", ctx.settings.api_url);
    println!("Registers:  {}", ctx.settings.registers);
    println!("Timeout:    {}s", ctx.settings.timeout_secs);
    println!();

    match ctx.backend.dashboard() {
        Ok(d) => {
            println!("Backend:    {}", "reachable".green());
            println!("Server day: {}", d.date);
            println!("Registers:  {} reported", d.registers.len());
        }
        Err(e) => {
            println!("Backend:    {} ({e})", "unreachable".red());
            println!("Run `caixa init URL` to point caixa at your server.");
        }
    }
    Ok(())
}

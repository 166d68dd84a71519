//! Chat command - Talk to the assistant about a report or in general

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use reconx::ui::{OutputMode, Printer, Spinner};
use reconx::Dashboard;

use crate::cli::find_completed_report;

pub async fn run(dashboard: &Dashboard, report_id: Option<&str>, message: Option<&str>) -> Result<()> {
    let printer = Printer::new();

    if let Some(report_id) = report_id {
        let report = find_completed_report(dashboard, report_id)?;
        dashboard.select(&report.id);
        printer.info(&format!("Chatting about {}", report.name));
    }

    if let Some(message) = message {
        let reply = ask(dashboard, &printer, message).await;
        printer.println(&reply);
        return Ok(());
    }

    if printer.mode() != OutputMode::Interactive {
        anyhow::bail!(
            "Interactive chat requires a TTY. Pass --message to send a single message."
        );
    }

    printer.info("Type a question, or an empty line to quit.");
    loop {
        let line: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;

        let line = line.trim();
        if line.is_empty() || line == "exit" || line == "quit" {
            break;
        }

        let reply = ask(dashboard, &printer, line).await;
        printer.newline();
        printer.println(&reply);
        printer.newline();
    }
    Ok(())
}

async fn ask(dashboard: &Dashboard, printer: &Printer, message: &str) -> String {
    let mut spinner = Spinner::new(printer.mode());
    spinner.start("Thinking...");
    let reply = dashboard.chat(message).await;
    spinner.finish_and_clear();
    reply
}

//! SMS body formatting.

use crate::alert::AlertLine;

/// First line of every alert message, followed by a blank line.
pub const ALERT_HEADER: &str = "🌱 Green Pulse Alert 🚨";

/// Closing line of every alert message, preceded by a blank line.
pub const ALERT_FOOTER: &str = "Check dashboard.";

/// Body sent by the standalone test-SMS binary.
pub const TEST_MESSAGE: &str = "🌱 This is a TEST SMS from Green Pulse!";

/// Build the SMS body for a non-empty list of alert lines.
///
/// Each line appears on its own row, in the order given, between the
/// fixed header and footer.
pub fn format_alert_message(alerts: &[AlertLine]) -> String {
    let lines: Vec<&str> = alerts.iter().map(|a| a.message.as_str()).collect();
    format!("{ALERT_HEADER}\n\n{}\n\n{ALERT_FOOTER}", lines.join("\n"))
}

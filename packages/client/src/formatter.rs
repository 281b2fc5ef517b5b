//! Snapshot formatting utilities for client display.

/// Snapshot formatter for client display
pub struct SnapshotFormatter;

impl SnapshotFormatter {
    /// Format a snapshot as a numbered list of candles
    ///
    /// # Arguments
    ///
    /// * `slots` - Payload of each candle, `None` when unlit
    ///
    /// # Returns
    ///
    /// A formatted string with one line per candle
    pub fn format_snapshot(slots: &[Option<String>]) -> String {
        let width = slots.len().saturating_sub(1).to_string().len();
        let lit = slots.iter().filter(|slot| slot.is_some()).count();

        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str(&format!("Candles ({} of {} lit):\n", lit, slots.len()));
        for (index, slot) in slots.iter().enumerate() {
            match slot {
                Some(message) => {
                    output.push_str(&format!("[{:>width$}] {}\n", index, message, width = width))
                }
                None => output.push_str(&format!("[{:>width$}] (unlit)\n", index, width = width)),
            }
        }
        output.push_str("============================================================\n");
        output
    }

    /// Format a text message that is not a snapshot
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[raw] {}\n", text)
    }
}

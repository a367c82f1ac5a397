//! Log Commands

const DEFAULT_LOG_LINES: usize = 100;

/// Newest log lines kept in memory, oldest first
#[tauri::command]
pub fn get_recent_logs(limit: Option<usize>) -> Vec<String> {
    rolling_logger::recent_lines(limit.unwrap_or(DEFAULT_LOG_LINES))
}

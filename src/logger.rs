use std::env;

/// Set up `log` output, filtered by `TIMESTR_LOG` (env_logger syntax, default `info`).
pub fn init() {
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters(env::var("TIMESTR_LOG").ok()))
        .init();
    log_panics::init();
}

fn filters(var: Option<String>) -> String {
    var.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "info".into())
}

#[cfg(test)]
mod tests {
    use super::filters;

    #[test]
    fn defaults_to_info() {
        assert_eq!(filters(None), "info");
        assert_eq!(filters(Some("  ".into())), "info");
        assert_eq!(filters(Some("timestr=debug".into())), "timestr=debug");
    }
}

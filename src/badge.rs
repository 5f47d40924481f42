/// Render a ticket status as a badge, e.g. `in_progress` becomes
/// `<span class="badge in_progress">in progress</span>`.
///
/// The status is interpolated as-is, so it must come from a trusted,
/// closed vocabulary such as [`TicketStatus`](crate::TicketStatus).
pub fn render_status_badge(status: &str) -> String {
    format!(
        r#"<span class="badge {}">{}</span>"#,
        status,
        status.replacen('_', " ", 1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscores_become_spaces_in_the_label() {
        let got = render_status_badge("in_progress");

        assert_eq!(got, r#"<span class="badge in_progress">in progress</span>"#);
    }

    #[test]
    fn only_the_first_underscore_is_replaced() {
        let got = render_status_badge("waiting_on_user");

        assert_eq!(
            got,
            r#"<span class="badge waiting_on_user">waiting on_user</span>"#
        );
    }

    #[test]
    fn plain_statuses_are_untouched() {
        let got = render_status_badge("OPEN");

        assert_eq!(got, r#"<span class="badge OPEN">OPEN</span>"#);
    }
}

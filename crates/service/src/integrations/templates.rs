//! HTML bodies for the outgoing emails.

use super::EmailMessage;

/// Minimal HTML escaping for user-supplied text.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn newsletter_welcome(to: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Welcome to the Fragma newsletter".into(),
        html: "<h1>Welcome to Fragma</h1>\
               <p>You're subscribed. We'll send deal announcements and platform updates to this address.</p>\
               <p>If this wasn't you, you can unsubscribe at any time.</p>"
            .into(),
    }
}

pub fn early_access_confirmation(to: &str, full_name: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your Fragma early access request".into(),
        html: format!(
            "<h1>Thanks, {}!</h1>\
             <p>We received your early access request. Our team reviews every submission and will reach out shortly.</p>",
            escape_html(full_name)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"O'Neil\" & co</b>"), "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn confirmation_embeds_escaped_name() {
        let m = early_access_confirmation("a@b.co", "<script>");
        assert_eq!(m.to, "a@b.co");
        assert!(m.html.contains("&lt;script&gt;"));
        assert!(!m.html.contains("<script>"));
    }
}

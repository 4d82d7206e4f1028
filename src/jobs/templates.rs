//! HTML bodies for outgoing customer email.

use crate::config::{COST_CURRENCY, SUPPORT_EMAIL};
use crate::domain::Parcel;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.5; color: #222; background-color: #FAFAFA; }
a { color: #000; text-decoration: none; }
h1 { font-size: 24px; font-weight: 700; text-align: center; margin: 0 0 15px 0; }
h2 { font-size: 18px; font-weight: 600; color: #0a0e27; }
p { margin: 0 0 15px 0; }
.wrapper { max-width: 700px; margin: 0 auto; }
.header { background-color: #1E1E1E; padding: 30px; color: #fff; }
.body { padding: 24px; background-color: #fff; }
.footer { background-color: #E9EB77; padding: 14px; text-align: center; }
.tracking-box { background-color: #E9EB77; border: 2px solid #D9D964; padding: 20px; border-radius: 8px; margin: 20px 0; text-align: center; }
.tracking-id { color: #0a0e27; font-size: 20px; font-weight: bold; font-family: monospace; }
.credentials-box { background-color: #f5f5f5; border-left: 4px solid #E9EB77; padding: 15px; margin: 15px 0; }";

/// Everything the approval email shows the customer.
#[derive(Debug, Clone)]
pub struct ApprovalEmail<'a> {
    pub fullname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub tracking_id: &'a str,
    pub recipient_name: &'a str,
    pub delivery_city: &'a str,
    pub weight: f64,
    pub cost: f64,
    pub login_url: &'a str,
}

impl ApprovalEmail<'_> {
    pub fn subject(&self) -> String {
        format!(
            "Your Parcel is Confirmed! Tracking ID: {}",
            escape_html(self.tracking_id)
        )
    }

    pub fn render(&self) -> String {
        let body = format!(
            r#"<p>Hello {fullname},</p>
<p>Great news! Your parcel booking request has been approved by our team and your shipment is now active in our system.</p>
<div class="tracking-box">
  <div><strong>Your Tracking ID:</strong></div>
  <div class="tracking-id">{tracking_id}</div>
</div>
<h2>Order Details:</h2>
<p><strong>Recipient Name:</strong> {recipient}</p>
<p><strong>Delivery City:</strong> {city}</p>
<p><strong>Weight:</strong> {weight} kg</p>
<p><strong>Cost:</strong> {currency} {cost}</p>
<h2>Your Login Credentials:</h2>
<div class="credentials-box">
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Password:</strong> {password}</p>
  <p><strong>Login URL:</strong> <a href="{login}">{login}</a></p>
</div>
<h2>What's Next?</h2>
<ul>
  <li>Log in to your account using the credentials above</li>
  <li>Use your Tracking ID to monitor your shipment status</li>
  <li>You'll receive email updates as your parcel moves through our delivery network</li>
</ul>
<p style="color: #888; font-size: 12px; margin-top: 30px;">Please keep your credentials secure and do not share them with anyone. If you did not request this shipment, please contact our support team immediately.</p>"#,
            fullname = escape_html(self.fullname),
            tracking_id = escape_html(self.tracking_id),
            recipient = escape_html(self.recipient_name),
            city = escape_html(self.delivery_city),
            weight = self.weight,
            currency = COST_CURRENCY,
            cost = self.cost,
            email = escape_html(self.email),
            password = escape_html(self.password),
            login = escape_html(self.login_url),
        );

        layout("Order Approved - SendIT", "Order Approved!", &body)
    }
}

/// Recipient role in a parcel-pending notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Sender,
    Recipient,
}

pub fn parcel_pending_subject(parcel: &Parcel) -> String {
    format!("Your parcel {} is pending", parcel.id)
}

/// "Your parcel is pending" notice sent to sender and recipient once a
/// provisioned parcel has been picked up by the notifier.
pub fn render_parcel_pending(parcel: &Parcel, role: PartyRole) -> String {
    let (greeting_name, summary) = match role {
        PartyRole::Sender => (
            &parcel.sendername,
            format!(
                "Your parcel to {} has been registered and is pending dispatch.",
                escape_html(&parcel.recipientname)
            ),
        ),
        PartyRole::Recipient => (
            &parcel.recipientname,
            format!(
                "{} has sent you a parcel. It is registered and pending dispatch.",
                escape_html(&parcel.sendername)
            ),
        ),
    };

    let note = parcel
        .note
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!("<p><strong>Note:</strong> {}</p>\n", escape_html(n)))
        .unwrap_or_default();

    let body = format!(
        r#"<p>Hello {name},</p>
<p>{summary}</p>
<div class="tracking-box">
  <div><strong>Tracking ID:</strong></div>
  <div class="tracking-id">{id}</div>
</div>
<h2>Parcel Details:</h2>
<p><strong>From:</strong> {from}</p>
<p><strong>To:</strong> {to}</p>
<p><strong>Weight:</strong> {weight} kg</p>
<p><strong>Status:</strong> {status}</p>
{note}"#,
        name = escape_html(greeting_name),
        summary = summary,
        id = parcel.id,
        from = escape_html(&parcel.from),
        to = escape_html(&parcel.to),
        weight = parcel.weight,
        status = parcel.status.label(),
        note = note,
    );

    layout("Parcel Pending - SendIT", "Parcel Pending", &body)
}

fn layout(title: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{style}
</style>
</head>
<body>
<div class="wrapper">
<div class="header"><h1>{heading}</h1></div>
<div class="body">
{body}
</div>
<div class="footer"><p style="margin: 0;">If you have any questions, please contact us at <a href="mailto:{support}">{support}</a></p></div>
</div>
</body>
</html>"#,
        title = title,
        style = STYLE,
        heading = heading,
        body = body,
        support = SUPPORT_EMAIL,
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParcelStatus;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_approval_email_contains_credentials_and_tracking() {
        let email = ApprovalEmail {
            fullname: "Jane <Admin>",
            email: "jane@example.com",
            password: "Ab3$xY9!kLmN",
            tracking_id: "4f9c2b7e-0000-4000-8000-000000000001",
            recipient_name: "Bob",
            delivery_city: "Mombasa",
            weight: 2.5,
            cost: 500.0,
            login_url: "http://localhost:5174/login",
        };

        let html = email.render();
        assert!(html.contains("Hello Jane &lt;Admin&gt;"));
        assert!(html.contains("Ab3$xY9!kLmN"));
        assert!(html.contains("4f9c2b7e-0000-4000-8000-000000000001"));
        assert!(html.contains("2.5 kg"));
        assert!(html.contains("PKR 500"));
        assert!(html.contains("http://localhost:5174/login"));
        assert!(email.subject().contains("4f9c2b7e"));
    }

    #[test]
    fn test_parcel_pending_addresses_each_party() {
        let now = Utc::now();
        let parcel = Parcel {
            id: Uuid::new_v4(),
            from: "Nairobi".to_string(),
            to: "Mombasa".to_string(),
            sendername: "Alice".to_string(),
            recipientname: "Bob".to_string(),
            senderemail: "a@x.com".to_string(),
            recipientemail: "b@x.com".to_string(),
            weight: 1.0,
            cost: 100.0,
            note: Some("Fragile".to_string()),
            date: now.to_rfc3339(),
            status: ParcelStatus::NotifyPending,
            origin_branch: None,
            destination_branch: None,
            created_at: now,
            updated_at: now,
        };

        let to_sender = render_parcel_pending(&parcel, PartyRole::Sender);
        assert!(to_sender.contains("Hello Alice"));
        assert!(to_sender.contains("to Bob"));
        assert!(to_sender.contains("Fragile"));

        let to_recipient = render_parcel_pending(&parcel, PartyRole::Recipient);
        assert!(to_recipient.contains("Hello Bob"));
        assert!(to_recipient.contains("Alice has sent you a parcel"));
        assert!(to_recipient.contains(&parcel.id.to_string()));
    }
}

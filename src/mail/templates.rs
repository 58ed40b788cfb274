//! Bodies for the two messages sent after a contact request is stored.

use ammonia::clean_text;

use super::OutgoingMail;
use crate::db::ContactRequest;

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Acknowledgement sent to the person who filled in the form.
pub fn client_confirmation(contact: &ContactRequest, brand: &str) -> OutgoingMail {
    let name = clean_text(&contact.name);
    let brand_html = clean_text(brand);

    let html = format!(
        r#"<div style="font-family:Inter,system-ui,Segoe UI,Roboto,Arial,sans-serif;line-height:1.6">
  <h3>Hi {name},</h3>
  <p>Thanks for contacting <b>{brand_html}</b>. We will get back to you shortly.</p>
  <p style="color:#777">This is an automated confirmation.</p>
</div>"#
    );
    let text = format!(
        "Hi {}, thanks for contacting {}. We will get back to you shortly.",
        contact.name, brand
    );

    OutgoingMail {
        to: contact.email.clone(),
        subject: "We received your request".to_string(),
        text: Some(text),
        html: Some(html),
    }
}

/// New-lead notice for the admin inbox.
pub fn admin_notification(contact: &ContactRequest, to: &str) -> OutgoingMail {
    let time = contact.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let html = format!(
        r#"<h3>New Contact</h3>
<ul>
  <li><b>Name:</b> {}</li>
  <li><b>Email:</b> {}</li>
  <li><b>WhatsApp:</b> {}</li>
  <li><b>Message:</b> {}</li>
  <li><b>Time:</b> {}</li>
</ul>"#,
        clean_text(&contact.name),
        clean_text(&contact.email),
        clean_text(or_dash(&contact.whatsapp)),
        clean_text(or_dash(&contact.message)),
        time,
    );
    let text = format!(
        "Name: {}\nEmail: {}\nWhatsApp: {}\nMessage: {}\nTime: {}",
        contact.name,
        contact.email,
        or_dash(&contact.whatsapp),
        or_dash(&contact.message),
        time,
    );

    OutgoingMail {
        to: to.to_string(),
        subject: "New Contact Request".to_string(),
        text: Some(text),
        html: Some(html),
    }
}

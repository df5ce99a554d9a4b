use askama::Template;

use crate::{
    domain::{NotificationKind, NotificationRequest},
    error::{AppError, Result},
};

/// Course name and link shown in every notification.
#[derive(Debug, Clone)]
pub struct Branding {
    pub course_name: String,
    pub site_url: String,
}

#[derive(Template)]
#[template(path = "email/announcement.html")]
struct AnnouncementEmail<'a> {
    course_name: &'a str,
    site_url: &'a str,
    title: &'a str,
    body_lines: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "email/material.html")]
struct MaterialEmail<'a> {
    course_name: &'a str,
    site_url: &'a str,
    title: &'a str,
    material_type: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

pub fn render(request: &NotificationRequest, branding: &Branding) -> Result<RenderedEmail> {
    let title = request.title.trim();

    let (subject, html) = match request.kind {
        NotificationKind::Announcement => {
            // Every `\n` becomes a `<br>`, including leading and trailing ones
            let body_lines = request
                .body
                .as_deref()
                .filter(|b| !b.is_empty())
                .map(|b| b.split('\n').collect())
                .unwrap_or_default();

            let template = AnnouncementEmail {
                course_name: &branding.course_name,
                site_url: &branding.site_url,
                title,
                body_lines,
            };
            (format!("New Announcement: {}", title), template.render())
        }
        NotificationKind::Material => {
            let template = MaterialEmail {
                course_name: &branding.course_name,
                site_url: &branding.site_url,
                title,
                material_type: request
                    .material_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty()),
            };
            (format!("New Course Material: {}", title), template.render())
        }
    };

    let html = html.map_err(|e| AppError::Internal(format!("Failed to render email: {}", e)))?;
    Ok(RenderedEmail { subject, html })
}

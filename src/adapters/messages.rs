//! Built-in English message catalog.
//!
//! Hosts with their own localization plug in another `Translator`.

use super::Translator;

pub const REQUIRED_TITLE: &str = "media.required.title";
pub const REQUIRED: &str = "media.required";
pub const ALREADY_EXISTS_TITLE: &str = "media.alreadyexists.title";
pub const ALREADY_EXISTS: &str = "media.alreadyexists";
pub const NOT_EXISTS_TITLE: &str = "media.notexists.title";
pub const NOT_EXISTS: &str = "media.notexists";
pub const FILE_NOT_FOUND_TITLE: &str = "media.filenotfound.title";
pub const FILE_NOT_FOUND: &str = "media.filenotfound";

/// Key of a field label, e.g. `media.field.title`
pub fn field_label_key(field: &str) -> String {
    format!("media.field.{}", field)
}

/// Translator backed by a static English table
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMessages;

impl EnglishMessages {
    fn template(key: &str) -> Option<&'static str> {
        let template = match key {
            REQUIRED_TITLE => "Required field",
            REQUIRED => "The field \"{0}\" is required.",
            ALREADY_EXISTS_TITLE => "Game already exists",
            ALREADY_EXISTS => "Another game with the same title and year already exists.",
            NOT_EXISTS_TITLE => "Game not found",
            NOT_EXISTS => "The game being edited no longer exists in the library.",
            FILE_NOT_FOUND_TITLE => "File not found",
            FILE_NOT_FOUND => "The file for \"{0}\" was not found: {1}",
            "media.field.title" => "Title",
            "media.field.year" => "Year",
            "media.field.imagelandscape" => "Landscape image",
            "media.field.imageportrait" => "Portrait image",
            "media.field.icon" => "Icon",
            _ => return None,
        };
        Some(template)
    }
}

impl Translator for EnglishMessages {
    fn translate(&self, key: &str, args: &[&str]) -> String {
        let Some(template) = Self::template(key) else {
            return key.to_string();
        };

        args.iter()
            .enumerate()
            .fold(template.to_string(), |text, (i, arg)| {
                text.replace(&format!("{{{}}}", i), arg)
            })
    }
}

use redact_core::{RedactionParameters, TargetSelection};
use reqwest::multipart::{Form, Part};

use crate::http::map_reqwest_error;
use crate::TransportError;

pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_FILENAME: &str = "photo.jpg";
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Multipart payload for `POST /process_image`, minus the image bytes.
///
/// Building never fails; the image URI is only resolved when the transport
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionRequest {
    pub image_uri: String,
    pub fields: Vec<(&'static str, String)>,
}

impl RedactionRequest {
    pub fn build(
        image_uri: impl Into<String>,
        parameters: &RedactionParameters,
        selection: &TargetSelection,
    ) -> Self {
        let fields = vec![
            ("method", parameters.method.as_str().to_string()),
            ("blur_ksize", parameters.blur_kernel_size.to_string()),
            ("mosaic_scale", format_scale(parameters.mosaic_scale)),
            ("query", selection_json(selection)),
        ];
        Self {
            image_uri: image_uri.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn into_form(self, image: Vec<u8>) -> Result<Form, TransportError> {
        let part = Part::bytes(image)
            .file_name(IMAGE_FILENAME)
            .mime_str(IMAGE_CONTENT_TYPE)
            .map_err(map_reqwest_error)?;
        let form = self
            .fields
            .into_iter()
            .fold(Form::new().part(IMAGE_FIELD, part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }
}

/// The backend parses one structured field, so labels go out as a JSON array.
/// `NaN` and finite values use Rust's shortest decimal form, so very large or
/// tiny scales are written without an exponent (`1e21` becomes
/// `1000000000000000000000`). Infinities are spelled `Infinity`.
fn format_scale(scale: f64) -> String {
    if scale.is_infinite() {
        let sign = if scale < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else {
        scale.to_string()
    }
}

fn selection_json(selection: &TargetSelection) -> String {
    let labels: Vec<&str> = selection.labels().collect();
    serde_json::Value::from(labels).to_string()
}

//! Post assembly - determines the final field values for a post from the
//! incoming request, prior state, and the description generator.

use std::sync::Arc;

use crate::domain::{PostFields, PostId, image_extension};
use crate::error::DomainError;
use crate::ports::{DescriptionGenerator, ImageStore, PostRepository};

/// Prompt used when the description field is missing.
pub const SUMMARY_PROMPT: &str =
    "Crie uma descrição resumida desta imagem, sem introdução, formatação ou quebra de linha.";

/// Prompt used when the alt-text field is missing.
pub const DETAILED_PROMPT: &str =
    "Crie uma descrição detalhada desta imagem, sem introdução, formatação ou quebra de linha.";

/// Substituted whenever the description service fails. Generation failures
/// degrade to this placeholder instead of aborting the request.
pub const FALLBACK_DESCRIPTION: &str = "Auto descrição indisponível.";

/// A freshly uploaded image: its bytes plus the client's original filename.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

/// The optional pieces of a create/update request that assembly consumes.
#[derive(Debug, Default)]
pub struct AssemblyInput {
    pub image: Option<UploadedImage>,
    pub description: Option<String>,
    pub alt: Option<String>,
}

/// The resolved field set, plus the previous image filename when one
/// existed - the signal to the caller that old-file cleanup is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPost {
    pub fields: PostFields,
    pub previous_image: Option<String>,
}

/// Builds the in-memory post record for a request: keeps supplied fields,
/// generates missing ones from whatever image bytes are available, and
/// decides whether the image is kept, replaced, or re-read from disk.
pub struct PostAssembler {
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
    describer: Arc<dyn DescriptionGenerator>,
}

impl PostAssembler {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        describer: Arc<dyn DescriptionGenerator>,
    ) -> Self {
        Self {
            posts,
            images,
            describer,
        }
    }

    /// Assemble the fields for a new post. The upload is mandatory; missing
    /// description/alt are generated from its bytes.
    pub async fn assemble_create(
        &self,
        input: AssemblyInput,
    ) -> Result<AssembledPost, DomainError> {
        let Some(upload) = input.image else {
            return Err(DomainError::Validation("Image is required.".to_string()));
        };

        let description = self
            .resolve_field(input.description, Some(&upload.bytes), SUMMARY_PROMPT, None)
            .await;
        let alt = self
            .resolve_field(input.alt, Some(&upload.bytes), DETAILED_PROMPT, None)
            .await;

        Ok(AssembledPost {
            fields: PostFields {
                image: upload.original_name,
                description,
                alt,
            },
            previous_image: None,
        })
    }

    /// Assemble the replacement fields for an existing post.
    ///
    /// A missing previous post is not fatal: the request simply proceeds
    /// without any prior image to fall back on. When no new file was sent
    /// and both text fields were omitted, the stored image is read back
    /// from disk so both fields can be regenerated; a missing file on disk
    /// degrades to keeping the previous values.
    pub async fn assemble_update(
        &self,
        id: &PostId,
        input: AssemblyInput,
    ) -> Result<AssembledPost, DomainError> {
        let previous = self.posts.find_by_id(id).await?;
        let previous_image = previous.as_ref().map(|p| p.fields.image.clone());

        let (image_name, bytes) = match input.image {
            Some(upload) => (upload.original_name, Some(upload.bytes)),
            None => {
                let name = previous_image.clone().unwrap_or_default();
                let mut bytes = None;
                if let Some(prev_name) = previous_image.as_deref() {
                    if input.description.is_none() && input.alt.is_none() {
                        // An unreadable file degrades the same way as a
                        // missing one.
                        bytes = self
                            .images
                            .read(&id.to_hex(), image_extension(prev_name))
                            .await
                            .unwrap_or(None);
                    }
                }
                (name, bytes)
            }
        };

        let description = self
            .resolve_field(
                input.description,
                bytes.as_deref(),
                SUMMARY_PROMPT,
                previous.as_ref().map(|p| p.fields.description.as_str()),
            )
            .await;
        let alt = self
            .resolve_field(
                input.alt,
                bytes.as_deref(),
                DETAILED_PROMPT,
                previous.as_ref().map(|p| p.fields.alt.as_str()),
            )
            .await;

        Ok(AssembledPost {
            fields: PostFields {
                image: image_name,
                description,
                alt,
            },
            previous_image,
        })
    }

    /// Field rule: use the provided value; else generate from the image
    /// bytes when available (failures degrade to the fallback string); else
    /// keep the prior value; else empty. No network call is made when no
    /// image data can be obtained.
    async fn resolve_field(
        &self,
        provided: Option<String>,
        bytes: Option<&[u8]>,
        prompt: &str,
        prior: Option<&str>,
    ) -> String {
        if let Some(value) = provided {
            return value;
        }
        if let Some(image) = bytes {
            return self
                .describer
                .describe(image, prompt)
                .await
                .unwrap_or_else(|_| FALLBACK_DESCRIPTION.to_string());
        }
        prior.map(str::to_string).unwrap_or_default()
    }
}

//! Post CRUD handlers.
//!
//! An invalid or unknown id is answered with a `null` body and status 200
//! on the read/update paths, matching what clients already expect.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, web};
use serde_json::Value;

use pixpost_core::assembly::{AssembledPost, AssemblyInput, UploadedImage};
use pixpost_core::domain::{Post, PostId, PostRemoval, image_extension};
use pixpost_shared::dto::{
    BulkDeleteResponse, CreatedPostResponse, DeletePostResponse, PostResponse, UpdatedPostResponse,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart body shared by create and update.
#[derive(Debug, MultipartForm)]
pub struct PostForm {
    #[multipart(rename = "imagem")]
    image: Option<TempFile>,
    #[multipart(rename = "descricao")]
    description: Option<Text<String>>,
    alt: Option<Text<String>>,
    #[multipart(rename = "imagemAnterior")]
    previous_image: Option<Text<String>>,
}

impl PostForm {
    /// Read the uploaded bytes (when present) and turn the form into an
    /// assembly input.
    async fn assembly_input(&self) -> AppResult<AssemblyInput> {
        let image = match &self.image {
            Some(file) => {
                let bytes = tokio::fs::read(file.file.path())
                    .await
                    .map_err(|e| AppError::Internal(format!("failed to read upload: {e}")))?;
                Some(UploadedImage {
                    bytes,
                    original_name: file.file_name.clone().unwrap_or_default(),
                })
            }
            None => None,
        };

        Ok(AssemblyInput {
            image,
            description: self.description.as_ref().map(|t| t.0.clone()),
            alt: self.alt.as_ref().map(|t| t.0.clone()),
        })
    }
}

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_hex(),
        image: post.fields.image,
        description: post.fields.description,
        alt: post.fields.alt,
    }
}

/// GET /posts/
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    let posts: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    let post = match PostId::parse(&raw_id) {
        Ok(id) => state.posts.find_by_id(&id).await?,
        Err(_) => None,
    };

    Ok(HttpResponse::Ok().json(post.map(post_response)))
}

/// POST /posts/
pub async fn create_post(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let input = form.assembly_input().await?;
    let assembled = state.assembler.assemble_create(input).await?;

    let id = state.posts.insert(&assembled.fields).await?;

    // The document exists before the file lands; the window is accepted.
    if let Some(file) = &form.image {
        let extension = image_extension(&assembled.fields.image);
        state
            .images
            .finalize(file.file.path(), &id.to_hex(), extension)
            .await?;
    }

    tracing::info!(post_id = %id.to_hex(), "post created");

    Ok(HttpResponse::Ok().json(CreatedPostResponse {
        id: id.to_hex(),
        image: assembled.fields.image,
        description: assembled.fields.description,
        alt: assembled.fields.alt,
    }))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    if form.image.is_some() && form.previous_image.is_none() {
        return Err(AppError::BadRequest(
            "Previous image reference is required when replacing the image.".to_string(),
        ));
    }

    let Ok(id) = PostId::parse(&raw_id) else {
        return Ok(HttpResponse::Ok().json(Value::Null));
    };

    let input = form.assembly_input().await?;
    let assembled = state.assembler.assemble_update(&id, input).await?;

    if let Some(file) = &form.image {
        // Remove the replaced file first; with an unchanged extension the
        // rename below would otherwise be clobbered.
        if let Some(previous) = assembled.previous_image.as_deref() {
            if let Err(e) = state
                .images
                .delete(&id.to_hex(), image_extension(previous))
                .await
            {
                tracing::warn!(post_id = %id.to_hex(), error = %e, "failed to remove replaced image");
            }
        }

        let extension = image_extension(&assembled.fields.image);
        state
            .images
            .finalize(file.file.path(), &id.to_hex(), extension)
            .await?;
    }

    state.posts.update(&id, &assembled.fields).await?;

    tracing::info!(post_id = %id.to_hex(), "post updated");

    let AssembledPost {
        fields,
        previous_image,
    } = assembled;

    Ok(HttpResponse::Ok().json(UpdatedPostResponse {
        image: fields.image,
        description: fields.description,
        alt: fields.alt,
        previous_image,
    }))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let raw_id = path.into_inner();

    let removal = match PostId::parse(&raw_id) {
        Ok(id) => {
            let removal = state.posts.delete(&id).await?;

            // File cleanup is best-effort; a document/file mismatch is
            // logged, not retried.
            if let Some(extension) = &removal.image_extension {
                if let Err(e) = state.images.delete(&id.to_hex(), extension).await {
                    tracing::warn!(post_id = %id.to_hex(), error = %e, "failed to remove image file");
                }
            }

            removal
        }
        Err(_) => PostRemoval {
            deleted_count: 0,
            image_extension: None,
        },
    };

    Ok(HttpResponse::Ok().json(DeletePostResponse {
        deleted_count: removal.deleted_count,
        image_extension: removal.image_extension,
    }))
}

/// DELETE /posts
///
/// Sequential best-effort sweep: one file deletion and one document
/// deletion per post, no transactional grouping.
pub async fn delete_all_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    let total = posts.len() as u64;
    let mut deleted = 0;

    for post in posts {
        let id = post.id.to_hex();
        let extension = image_extension(&post.fields.image);

        if let Err(e) = state.images.delete(&id, extension).await {
            tracing::warn!(post_id = %id, error = %e, "failed to remove image file");
        }

        match state.posts.delete(&post.id).await {
            Ok(_) => {
                tracing::info!(post_id = %id, "post deleted");
                deleted += 1;
            }
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "failed to delete post");
            }
        }
    }

    Ok(HttpResponse::Ok().json(BulkDeleteResponse { total, deleted }))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use bson::oid::ObjectId;

    use pixpost_core::assembly::PostAssembler;
    use pixpost_core::domain::{Post, PostFields, PostRemoval};
    use pixpost_core::error::RepoError;
    use pixpost_core::ports::{
        DescribeError, DescriptionGenerator, ImageStore, ImageStoreError, PostRepository,
    };

    use super::*;
    use crate::handlers::configure_routes;
    use crate::state::AppState;

    /// In-memory post repository keyed by hex id.
    #[derive(Default)]
    struct MemoryRepo {
        posts: Mutex<HashMap<String, Post>>,
    }

    #[async_trait]
    impl PostRepository for MemoryRepo {
        async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
            Ok(self.posts.lock().unwrap().values().cloned().collect())
        }

        async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, RepoError> {
            Ok(self.posts.lock().unwrap().get(&id.to_hex()).cloned())
        }

        async fn insert(&self, fields: &PostFields) -> Result<PostId, RepoError> {
            let id = PostId::from(ObjectId::new());
            self.posts.lock().unwrap().insert(
                id.to_hex(),
                Post {
                    id: id.clone(),
                    fields: fields.clone(),
                },
            );
            Ok(id)
        }

        async fn update(&self, id: &PostId, fields: &PostFields) -> Result<bool, RepoError> {
            let mut posts = self.posts.lock().unwrap();
            match posts.get_mut(&id.to_hex()) {
                Some(post) => {
                    post.fields = fields.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, id: &PostId) -> Result<PostRemoval, RepoError> {
            let removed = self.posts.lock().unwrap().remove(&id.to_hex());
            Ok(PostRemoval {
                deleted_count: removed.is_some() as u64,
                image_extension: removed
                    .map(|post| image_extension(&post.fields.image).to_string()),
            })
        }

        async fn list_clusters(&self) -> Result<BTreeMap<String, Vec<String>>, RepoError> {
            Ok(BTreeMap::from([(
                "pixpost".to_string(),
                vec!["posts".to_string()],
            )]))
        }
    }

    /// Image store backed by a map keyed on `<id>.<ext>`.
    #[derive(Default)]
    struct MemoryImages {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl ImageStore for MemoryImages {
        async fn finalize(
            &self,
            temp_path: &Path,
            id: &str,
            extension: &str,
        ) -> Result<(), ImageStoreError> {
            let bytes = std::fs::read(temp_path).unwrap_or_default();
            self.files
                .lock()
                .unwrap()
                .insert(format!("{id}.{extension}"), bytes);
            Ok(())
        }

        async fn delete(&self, id: &str, extension: &str) -> Result<(), ImageStoreError> {
            self.files
                .lock()
                .unwrap()
                .remove(&format!("{id}.{extension}"));
            Ok(())
        }

        async fn read(
            &self,
            id: &str,
            extension: &str,
        ) -> Result<Option<Vec<u8>>, ImageStoreError> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .get(&format!("{id}.{extension}"))
                .cloned())
        }
    }

    struct CannedDescriber;

    #[async_trait]
    impl DescriptionGenerator for CannedDescriber {
        async fn describe(&self, _image: &[u8], _prompt: &str) -> Result<String, DescribeError> {
            Ok("a generated description".to_string())
        }
    }

    struct TestHarness {
        repo: Arc<MemoryRepo>,
        images: Arc<MemoryImages>,
        state: AppState,
    }

    fn harness() -> TestHarness {
        let repo = Arc::new(MemoryRepo::default());
        let images = Arc::new(MemoryImages::default());
        let posts: Arc<dyn PostRepository> = repo.clone();
        let store: Arc<dyn ImageStore> = images.clone();
        let assembler = Arc::new(PostAssembler::new(
            posts.clone(),
            store.clone(),
            Arc::new(CannedDescriber),
        ));
        TestHarness {
            repo,
            images,
            state: AppState {
                posts,
                images: store,
                assembler,
            },
        }
    }

    async fn seed_post(harness: &TestHarness) -> String {
        let id = harness
            .repo
            .insert(&PostFields {
                image: "cat.png".to_string(),
                description: "A cat".to_string(),
                alt: "A tabby cat".to_string(),
            })
            .await
            .unwrap();
        harness
            .images
            .files
            .lock()
            .unwrap()
            .insert(format!("{}.png", id.to_hex()), b"png".to_vec());
        id.to_hex()
    }

    macro_rules! app {
        ($harness:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($harness.state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    #[actix_web::test]
    async fn get_unknown_post_returns_null() {
        let harness = harness();
        let app = app!(harness);

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{}", ObjectId::new().to_hex()))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(&body[..], b"null");
    }

    #[actix_web::test]
    async fn invalid_id_behaves_as_not_found() {
        let harness = harness();
        let app = app!(harness);

        let req = test::TestRequest::get().uri("/posts/not-an-id").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(&test::read_body(resp).await[..], b"null");
    }

    #[actix_web::test]
    async fn create_without_image_is_a_400() {
        let harness = harness();
        let app = app!(harness);

        let (content_type, body) = multipart(&[("descricao", None, b"A cat")]);
        let req = test::TestRequest::post()
            .uri("/posts/")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn create_fills_missing_alt_and_stores_the_file() {
        let harness = harness();
        let app = app!(harness);

        let (content_type, body) = multipart(&[
            ("imagem", Some("cat.png"), b"png bytes"),
            ("descricao", None, b"A cat"),
        ]);
        let req = test::TestRequest::post()
            .uri("/posts/")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(created["imagem"], "cat.png");
        assert_eq!(created["descricao"], "A cat");
        assert_eq!(created["alt"], "a generated description");

        let id = created["id"].as_str().unwrap();
        assert!(
            harness
                .images
                .files
                .lock()
                .unwrap()
                .contains_key(&format!("{id}.png"))
        );

        // Round-trip: the stored document matches the response.
        let req = test::TestRequest::get()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let fetched: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched["descricao"], "A cat");
        assert_eq!(fetched["imagem"], "cat.png");
    }

    #[actix_web::test]
    async fn update_with_file_requires_the_previous_image_field() {
        let harness = harness();
        let id = seed_post(&harness).await;
        let app = app!(harness);

        let (content_type, body) = multipart(&[("imagem", Some("new.jpg"), b"jpg bytes")]);
        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn update_replaces_the_image_and_reports_the_previous_one() {
        let harness = harness();
        let id = seed_post(&harness).await;
        let app = app!(harness);

        let (content_type, body) = multipart(&[
            ("imagem", Some("new.jpg"), b"jpg bytes"),
            ("imagemAnterior", None, b"cat.png"),
            ("descricao", None, b"A dog"),
            ("alt", None, b"A brown dog"),
        ]);
        let req = test::TestRequest::put()
            .uri(&format!("/posts/{id}"))
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(updated["imagem"], "new.jpg");
        assert_eq!(updated["imagemAnterior"], "cat.png");

        let files = harness.images.files.lock().unwrap();
        assert!(!files.contains_key(&format!("{id}.png")));
        assert!(files.contains_key(&format!("{id}.jpg")));
    }

    #[actix_web::test]
    async fn delete_removes_document_and_file_and_is_idempotent() {
        let harness = harness();
        let id = seed_post(&harness).await;
        let app = app!(harness);

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let first: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(first["deletedCount"], 1);
        assert_eq!(first["imgExtension"], "png");
        assert!(
            !harness
                .images
                .files
                .lock()
                .unwrap()
                .contains_key(&format!("{id}.png"))
        );

        // Second delete: nothing left, no extension payload.
        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{id}"))
            .to_request();
        let second: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(second["deletedCount"], 0);
        assert!(second.get("imgExtension").is_none());
    }

    #[actix_web::test]
    async fn bulk_delete_reports_totals_and_empties_the_collection() {
        let harness = harness();
        seed_post(&harness).await;
        seed_post(&harness).await;
        let app = app!(harness);

        let req = test::TestRequest::delete().uri("/posts").to_request();
        let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(summary["total"], 2);
        assert_eq!(summary["deleted"], 2);
        assert!(harness.images.files.lock().unwrap().is_empty());

        // Re-running on the now-empty collection.
        let req = test::TestRequest::delete().uri("/posts").to_request();
        let summary: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(summary["total"], 0);
        assert_eq!(summary["deleted"], 0);
    }

    #[actix_web::test]
    async fn clusters_endpoint_lists_databases() {
        let harness = harness();
        let app = app!(harness);

        let req = test::TestRequest::get().uri("/clusters/").to_request();
        let clusters: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(clusters["pixpost"][0], "posts");
    }
}

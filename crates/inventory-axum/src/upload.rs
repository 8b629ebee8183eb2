//! Multipart form parsing.
//!
//! The photo part is written to the asset directory as soon as it is read,
//! so the returned [`Upload`] may own a staged file. Whoever holds it must
//! hand the file to the inventory service or call [`Upload::discard`].

use std::collections::HashMap;

use axum::extract::Multipart;
use inventory_core::{AssetStore, StagedAsset};
use tracing::warn;

use crate::error::HttpError;

/// Name of the multipart part that carries the photo.
pub const PHOTO_FIELD: &str = "photo";

/// Text fields and the staged photo of one multipart request.
#[derive(Debug, Default)]
pub struct Upload {
    fields: HashMap<String, String>,
    photo: Option<StagedAsset>,
}

impl Upload {
    /// Read every part of `multipart`, staging the photo through `assets`.
    ///
    /// On error nothing stays behind in the asset directory.
    pub async fn read(mut multipart: Multipart, assets: &dyn AssetStore) -> Result<Self, HttpError> {
        let mut upload = Self::default();
        match upload.read_parts(&mut multipart, assets).await {
            Ok(()) => Ok(upload),
            Err(e) => {
                upload.discard(assets).await;
                Err(e)
            }
        }
    }

    async fn read_parts(
        &mut self,
        multipart: &mut Multipart,
        assets: &dyn AssetStore,
    ) -> Result<(), HttpError> {
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name != PHOTO_FIELD {
                let value = field.text().await?;
                self.fields.insert(name, value);
                continue;
            }

            // A file input left empty still sends a part, with no file name.
            if field.file_name().is_none_or(str::is_empty) {
                continue;
            }
            if self.photo.is_some() {
                return Err(HttpError::BadRequest(
                    "Only one photo may be uploaded".to_string(),
                ));
            }
            let bytes = field.bytes().await?;
            self.photo = Some(assets.write_new(&bytes).await?);
        }
        Ok(())
    }

    /// Remove and return a text field.
    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Take ownership of the staged photo, if one was uploaded.
    pub const fn take_photo(&mut self) -> Option<StagedAsset> {
        self.photo.take()
    }

    /// Delete the staged photo, if any.
    pub async fn discard(&mut self, assets: &dyn AssetStore) {
        let Some(staged) = self.photo.take() else {
            return;
        };
        let removed = match assets.bind(staged.path()) {
            Ok(reference) => assets.remove(&reference).await.map(|_| ()),
            Err(e) => Err(e),
        };
        if let Err(e) = removed {
            warn!(
                target: "inventory.assets",
                path = %staged.path().display(),
                error = %e,
                "failed to discard staged upload"
            );
        }
    }
}

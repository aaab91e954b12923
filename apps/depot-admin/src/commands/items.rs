use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Subcommand};
use resources_sdk::{Category, CreateRequest, ImageFile, ImageSlot, Item, ItemImages, NewItem};

use super::Context;

const COLUMNS: &[&str] = &["id", "name", "category", "description"];

#[derive(Subcommand)]
pub enum ItemsCommand {
    /// List catalog items, optionally filtered by name or category
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a catalog item with up to four images
    Add(AddItemArgs),
}

#[derive(Args)]
pub struct AddItemArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    price: f64,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long)]
    quantity: i64,
    #[arg(long)]
    bestseller: bool,
    #[arg(long)]
    image1: Option<PathBuf>,
    #[arg(long)]
    image2: Option<PathBuf>,
    #[arg(long)]
    image3: Option<PathBuf>,
    #[arg(long)]
    image4: Option<PathBuf>,
}

impl ItemsCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List { search } => ctx.list::<Item>(search.as_deref(), COLUMNS).await,
            Self::Add(args) => {
                let request = args.into_request().await?;
                let item = ctx.controller::<Item>().create(request).await?;
                ctx.output.item(&item)
            }
        }
    }
}

impl AddItemArgs {
    async fn into_request(self) -> anyhow::Result<CreateRequest> {
        let item = NewItem {
            name: self.name,
            description: self.description,
            price: Some(self.price),
            category: self.category,
            quantity: Some(self.quantity),
            bestseller: self.bestseller,
        };

        let mut images = ItemImages::default();
        let paths = [self.image1, self.image2, self.image3, self.image4];
        for (slot, path) in ImageSlot::ALL.into_iter().zip(paths) {
            if let Some(path) = path {
                images.set(slot, read_image(&path).await?);
            }
        }
        Ok(CreateRequest::new_item(&item, images)?)
    }
}

async fn read_image(path: &Path) -> anyhow::Result<ImageFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(ImageFile {
        file_name,
        content_type: image_mime(path).map(|m| m.essence_str().to_owned()),
        bytes,
    })
}

fn image_mime(path: &Path) -> Option<mime::Mime> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "bmp" => Some(mime::IMAGE_BMP),
        "svg" => Some(mime::IMAGE_SVG),
        _ => None,
    }
}

#[derive(Subcommand)]
pub enum CategoriesCommand {
    /// List catalog categories
    List,
}

impl CategoriesCommand {
    pub async fn run(self, ctx: &Context) -> anyhow::Result<()> {
        match self {
            Self::List => ctx.list::<Category>(None, &["category"]).await,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(image1: Option<PathBuf>) -> AddItemArgs {
        AddItemArgs {
            name: "Pallet jack".to_owned(),
            description: String::new(),
            price: 349.0,
            category: "Tools".to_owned(),
            quantity: 3,
            bestseller: false,
            image1,
            image2: None,
            image3: None,
            image4: None,
        }
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(image_mime(Path::new("a/b.JPG")), Some(mime::IMAGE_JPEG));
        assert_eq!(image_mime(Path::new("b.png")), Some(mime::IMAGE_PNG));
        assert_eq!(image_mime(Path::new("notes.txt")), None);
        assert_eq!(image_mime(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn request_carries_image_part() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let request = args(Some(file.path().to_path_buf()))
            .into_request()
            .await
            .unwrap();
        assert_eq!(request.payload["name"], "Pallet jack");
        assert_eq!(request.attachments.len(), 1);
        assert_eq!(request.attachments[0].field, "image1");
        assert_eq!(request.attachments[0].content_type.as_deref(), Some("image/png"));
        assert_eq!(request.attachments[0].bytes, b"\x89PNG");
    }

    #[tokio::test]
    async fn missing_image_file_fails() {
        let err = args(Some(PathBuf::from("/nonexistent/pic.png")))
            .into_request()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read image"));
    }
}

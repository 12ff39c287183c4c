use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use super::plain_amount;
use crate::attachment::{BillImage, JpegInfo};
use crate::models::Expense;
use crate::summary::Summary;

// A4, in millimetres
pub(crate) const PAGE_WIDTH_MM: f32 = 210.0;
pub(crate) const PAGE_HEIGHT_MM: f32 = 297.0;

const LEFT_MM: f32 = 10.0;
const TOP_MM: f32 = 10.0;
const PAGE_BREAK_MM: f32 = 270.0;
const HEADER_GAP_MM: f32 = 10.0;
const LINE_GAP_MM: f32 = 7.0;
const RECORD_GAP_MM: f32 = 5.0;
const IMAGE_WIDTH_MM: f32 = 50.0;
const IMAGE_HEIGHT_MM: f32 = 30.0;
const IMAGE_GAP_MM: f32 = 35.0;
const IMAGE_FAILED_GAP_MM: f32 = 5.0;

const FONT_NAME: &str = "F1";
const FONT_SIZE: i64 = 12;

/// A JPEG ready to be placed as an image XObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EmbeddedImage {
    pub(crate) bytes: Vec<u8>,
    pub(crate) info: JpegInfo,
}

/// One positioned element. Coordinates are millimetres from the top-left
/// corner; text `y` is the baseline, image `y` is the top edge.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Text {
        x: f32,
        y: f32,
        text: String,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: EmbeddedImage,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Page {
    pub(crate) items: Vec<Item>,
}

/// Report layout: a budget line, then per expense a heading line, a
/// description line and an optional bill image. A new page starts once the
/// cursor passes the bottom threshold and more content follows.
pub(crate) fn layout(expenses: &[Expense], budget: Decimal, currency: &str) -> Vec<Page> {
    let summary = Summary::compute(expenses, budget);
    let mut pages = vec![Page::default()];
    let mut y = TOP_MM;

    push_text(
        &mut pages,
        y,
        format!(
            "Budget: {currency}{} | Remaining: {currency}{}",
            plain_amount(summary.budget),
            plain_amount(summary.remaining)
        ),
    );
    y += HEADER_GAP_MM;

    let mut new_page_pending = false;
    for (index, expense) in expenses.iter().enumerate() {
        if new_page_pending {
            pages.push(Page::default());
            y = TOP_MM;
            new_page_pending = false;
        }

        push_text(
            &mut pages,
            y,
            format!(
                "{}. {} | {} | {currency}{}",
                index + 1,
                expense.date,
                expense.kind,
                plain_amount(expense.amount)
            ),
        );
        y += LINE_GAP_MM;
        push_text(&mut pages, y, format!("Description: {}", expense.description));
        y += LINE_GAP_MM;

        if let Some(url) = &expense.image {
            match embeddable_image(url) {
                Ok(image) => {
                    if let Some(page) = pages.last_mut() {
                        page.items.push(Item::Image {
                            x: LEFT_MM,
                            y,
                            width: IMAGE_WIDTH_MM,
                            height: IMAGE_HEIGHT_MM,
                            image,
                        });
                    }
                    y += IMAGE_GAP_MM;
                }
                Err(e) => {
                    warn!(record = index + 1, "Skipping bill image in PDF: {e:#}");
                    y += IMAGE_FAILED_GAP_MM;
                }
            }
        }
        y += RECORD_GAP_MM;

        if y > PAGE_BREAK_MM {
            new_page_pending = true;
        }
    }

    pages
}

fn push_text(pages: &mut [Page], y: f32, text: String) {
    if let Some(page) = pages.last_mut() {
        page.items.push(Item::Text { x: LEFT_MM, y, text });
    }
}

fn embeddable_image(data_url: &str) -> Result<EmbeddedImage> {
    let image = BillImage::from_data_url(data_url)?;
    if !image.is_jpeg() {
        anyhow::bail!("only JPEG images can be embedded (got {})", image.mime());
    }
    let info = image
        .jpeg_info()
        .context("JPEG has no readable frame header")?;
    if color_space(info.components).is_none() {
        anyhow::bail!("unsupported JPEG with {} components", info.components);
    }
    Ok(EmbeddedImage {
        bytes: image.bytes().to_vec(),
        info,
    })
}

fn color_space(components: u8) -> Option<&'static str> {
    match components {
        1 => Some("DeviceGray"),
        3 => Some("DeviceRGB"),
        4 => Some("DeviceCMYK"),
        _ => None,
    }
}

/// Map text onto the single-byte encoding of the standard Helvetica font.
/// The rupee sign becomes `Rs.`; anything else outside Latin-1 becomes `?`.
pub(crate) fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{20B9}' => out.extend_from_slice(b"Rs."),
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => out.push(c as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Build the PDF document from laid-out pages.
pub(crate) fn render(pages: &[Page]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let page_height_pt = mm_to_pt(PAGE_HEIGHT_MM);
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        for item in &page.items {
            match item {
                Item::Text { x, y, text } => {
                    operations.push(Operation::new("BT", vec![]));
                    operations.push(Operation::new(
                        "Tf",
                        vec![FONT_NAME.into(), FONT_SIZE.into()],
                    ));
                    operations.push(Operation::new(
                        "Td",
                        vec![mm_to_pt(*x).into(), (page_height_pt - mm_to_pt(*y)).into()],
                    ));
                    operations.push(Operation::new(
                        "Tj",
                        vec![Object::String(encode_text(text), StringFormat::Literal)],
                    ));
                    operations.push(Operation::new("ET", vec![]));
                }
                Item::Image {
                    x,
                    y,
                    width,
                    height,
                    image,
                } => {
                    let name = format!("Im{}", xobjects.len());
                    let image_id = add_jpeg(&mut doc, image);
                    xobjects.set(name.as_bytes().to_vec(), image_id);

                    let bottom = page_height_pt - mm_to_pt(*y + *height);
                    operations.push(Operation::new("q", vec![]));
                    operations.push(Operation::new(
                        "cm",
                        vec![
                            mm_to_pt(*width).into(),
                            Object::Integer(0),
                            Object::Integer(0),
                            mm_to_pt(*height).into(),
                            mm_to_pt(*x).into(),
                            bottom.into(),
                        ],
                    ));
                    operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
                    operations.push(Operation::new("Q", vec![]));
                }
            }
        }

        let content = Content { operations }
            .encode()
            .context("Failed to encode PDF page content")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let mut resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => font_id },
        };
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).context("Too many PDF pages")?;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            mm_to_pt(PAGE_WIDTH_MM).into(),
            page_height_pt.into(),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    Ok(doc)
}

fn add_jpeg(doc: &mut Document, image: &EmbeddedImage) -> ObjectId {
    let color_space = color_space(image.info.components).unwrap_or("DeviceRGB");
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.info.width),
            "Height" => i64::from(image.info.height),
            "ColorSpace" => color_space,
            "BitsPerComponent" => i64::from(image.info.bits_per_component),
            "Filter" => "DCTDecode",
        },
        image.bytes.clone(),
    )
    .with_compression(false);
    doc.add_object(stream)
}

pub(crate) fn write_pdf<W: Write>(
    expenses: &[Expense],
    budget: Decimal,
    currency: &str,
    writer: &mut W,
) -> Result<usize> {
    let pages = layout(expenses, budget, currency);
    let mut doc = render(&pages)?;
    doc.save_to(writer).context("Failed to write PDF")?;
    Ok(pages.len())
}

/// Export to a file, returning the number of pages written.
pub(crate) fn export_pdf(
    expenses: &[Expense],
    budget: Decimal,
    currency: &str,
    path: &Path,
) -> Result<usize> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let pages = write_pdf(expenses, budget, currency, &mut file)?;
    info!(path = %path.display(), records = expenses.len(), pages, "Exported PDF");
    Ok(pages)
}

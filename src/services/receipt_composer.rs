//! 回执合成 - 业务能力层
//!
//! 在回执 PDF 末尾追加一页，绘制机器人预览图。原有页面保持不变

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A4 页面尺寸（pt）
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const PAGE_MARGIN: f32 = 36.0;

/// 把 `image` 嵌入 `receipt`，结果写到 `output`
pub fn embed_screenshot_to_receipt(receipt: &Path, image: &Path, output: &Path) -> AppResult<()> {
    for input in [receipt, image] {
        if !input.is_file() {
            return Err(AppError::Composition(format!("文件不存在: {}", input.display())));
        }
    }

    let mut doc = Document::load(receipt)
        .map_err(|e| AppError::Composition(format!("无法读取回执 {}: {}", receipt.display(), e)))?;
    let picture = image::open(image)?.to_rgb8();
    let (width, height) = picture.dimensions();
    if width == 0 || height == 0 {
        return Err(AppError::Composition(format!("截图为空: {}", image.display())));
    }

    let mut image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        picture.into_raw(),
    );
    // 原始 RGB 数据很大，写入前用 FlateDecode 压缩
    image_stream.compress()?;
    let image_id = doc.add_object(image_stream);

    let (draw_width, draw_height) = fit_into_page(width as f32, height as f32);
    let x = (PAGE_WIDTH - draw_width) / 2.0;
    let y = PAGE_HEIGHT - PAGE_MARGIN - draw_height;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    draw_width.into(),
                    0.0f32.into(),
                    0.0f32.into(),
                    draw_height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    append_page(&mut doc, image_id, content_id)?;

    doc.save(output)
        .map_err(|e| AppError::Composition(format!("无法写入 {}: {}", output.display(), e)))?;
    debug!("已合成: {}", output.display());
    Ok(())
}

/// 保持宽高比，缩放到页边距以内（不放大）
fn fit_into_page(width: f32, height: f32) -> (f32, f32) {
    let max_width = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let max_height = PAGE_HEIGHT - 2.0 * PAGE_MARGIN;
    let scale = (max_width / width).min(max_height / height).min(1.0);
    (width * scale, height * scale)
}

fn append_page(doc: &mut Document, image_id: ObjectId, content_id: ObjectId) -> AppResult<()> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let pages_id = doc.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (PAGE_WIDTH as i64).into(), (PAGE_HEIGHT as i64).into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
    });

    let pages = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    pages.get_mut(b"Kids")?.as_array_mut()?.push(Object::Reference(page_id));
    let count = pages.get(b"Count")?.as_i64()?;
    pages.set("Count", count + 1);
    Ok(())
}

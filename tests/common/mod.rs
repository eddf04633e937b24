//! 测试用的内存下单网站

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use async_trait::async_trait;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use robot_order_bot::{AppError, AppResult, ModelRow, OrderRecord, RobotSite, SubmitOutcome};

/// 永远提交失败
pub const ALWAYS: usize = usize::MAX;

/// 内存下单网站
///
/// 每个订单号可以配置"前 n 次提交失败"，其余行为与真实页面一致
#[derive(Default)]
pub struct FakeSite {
    pub model_rows: Vec<ModelRow>,
    pub failures_before_success: HashMap<u32, usize>,
    pub missing_receipt_for: HashSet<u32>,
    pub broken_preview_for: HashSet<u32>,
    pub errors_before_success: HashMap<u32, usize>,
    pub submit_calls: HashMap<u32, usize>,
    pub open_calls: usize,
    current: Option<OrderRecord>,
    accepted: bool,
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            model_rows: standard_model_rows(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, order_number: u32, times: usize) -> Self {
        self.failures_before_success.insert(order_number, times);
        self
    }

    /// 前 `times` 次提交直接返回错误（而不是页面提示）
    pub fn erroring(mut self, order_number: u32, times: usize) -> Self {
        self.errors_before_success.insert(order_number, times);
        self
    }

    /// 预览截图返回无法解码的数据
    pub fn with_broken_preview(mut self, order_number: u32) -> Self {
        self.broken_preview_for.insert(order_number);
        self
    }

    pub fn without_receipt(mut self, order_number: u32) -> Self {
        self.missing_receipt_for.insert(order_number);
        self
    }

    pub fn total_submits(&self) -> usize {
        self.submit_calls.values().sum()
    }

    fn current_number(&self) -> AppResult<u32> {
        self.current
            .as_ref()
            .map(|o| o.order_number)
            .ok_or_else(|| AppError::Browser("表单未填写".to_string()))
    }
}

#[async_trait]
impl RobotSite for FakeSite {
    async fn open_order_page(&mut self) -> AppResult<()> {
        self.open_calls += 1;
        self.current = None;
        self.accepted = false;
        Ok(())
    }

    async fn read_model_table(&mut self) -> AppResult<Vec<ModelRow>> {
        Ok(self.model_rows.clone())
    }

    async fn fill_order_form(&mut self, order: &OrderRecord) -> AppResult<()> {
        self.current = Some(order.clone());
        Ok(())
    }

    async fn preview_robot(&mut self) -> AppResult<()> {
        self.current_number().map(|_| ())
    }

    async fn submit_order(&mut self) -> AppResult<SubmitOutcome> {
        let number = self.current_number()?;
        let calls = self.submit_calls.entry(number).or_insert(0);
        *calls += 1;
        let errors = self.errors_before_success.get(&number).copied().unwrap_or(0);
        if *calls <= errors {
            return Err(AppError::Browser("Target closed".to_string()));
        }
        let failures = self.failures_before_success.get(&number).copied().unwrap_or(0);
        if *calls <= errors + failures {
            Ok(SubmitOutcome::Rejected("External Server Error".to_string()))
        } else {
            self.accepted = true;
            Ok(SubmitOutcome::Accepted)
        }
    }

    async fn capture_preview_png(&mut self) -> AppResult<Vec<u8>> {
        if !self.accepted {
            return Err(AppError::Export("确认页缺少 #robot-preview-image".to_string()));
        }
        if self.broken_preview_for.contains(&self.current_number()?) {
            return Ok(b"not really a png".to_vec());
        }
        Ok(png_bytes(12, 18))
    }

    async fn print_receipt_pdf(&mut self) -> AppResult<Vec<u8>> {
        let number = self.current_number()?;
        if !self.accepted || self.missing_receipt_for.contains(&number) {
            return Err(AppError::Export("确认页缺少 #receipt".to_string()));
        }
        Ok(receipt_pdf_bytes(&format!("Receipt RSB-ROBO-ORDER-{}", number)))
    }
}

pub fn standard_model_rows() -> Vec<ModelRow> {
    [
        ("Roll-a-thor", "1"),
        ("Peanut crusher", "2"),
        ("D.A.V.E", "3"),
        ("Andy Roid", "4"),
        ("Spanner mate", "5"),
        ("Drillbit 2000", "6"),
    ]
    .into_iter()
    .map(|(name, part)| ModelRow {
        name: name.to_string(),
        part: part.to_string(),
    })
    .collect()
}

pub fn order(order_number: u32, head: u32) -> OrderRecord {
    OrderRecord {
        order_number,
        head,
        body: 2,
        legs: 3,
        address: format!("Address {}", order_number),
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([10u8, 120, 200])));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

/// 只有一页文字的回执 PDF
pub fn receipt_pdf_bytes(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 770.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// 压缩包中的条目名
pub fn archive_entries(path: &std::path::Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

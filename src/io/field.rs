//! # 流场数据导出
//!
//! 以分隔文本格式保存和读取 PIV 流场结果。
//!
//! ## 文件格式
//! 每行一个矢量：`x  y  u  v  mask`，默认制表符分隔，`%8.4f` 格式。
//! `mask` 为 1 表示无效矢量。读取时空白分隔符（空格、制表符）的连续出现
//! 视为一个分隔。
//!
//! ## 依赖关系
//! - 被 `plot/` 和 `commands/` 模块调用
//! - 使用 `csv` 库读写，`serde` 反序列化每行

use crate::error::{PivError, Result};

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// PIV 流场
///
/// 各列长度由 [`FlowField::new`] 保证一致，因此字段不对外可变。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowField {
    /// 查询窗口中心 x 坐标（像素）
    x: Vec<f64>,
    /// 查询窗口中心 y 坐标（像素）
    y: Vec<f64>,
    /// x 方向速度分量
    u: Vec<f64>,
    /// y 方向速度分量
    v: Vec<f64>,
    /// 无效矢量标记
    mask: Vec<bool>,
}

impl FlowField {
    /// 创建流场，要求所有列长度一致
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        u: Vec<f64>,
        v: Vec<f64>,
        mask: Vec<bool>,
    ) -> Result<Self> {
        let n = x.len();
        if [y.len(), u.len(), v.len(), mask.len()].iter().any(|&len| len != n) {
            return Err(PivError::InvalidArgument(format!(
                "flow field columns differ in length: x={}, y={}, u={}, v={}, mask={}",
                n,
                y.len(),
                u.len(),
                v.len(),
                mask.len()
            )));
        }
        Ok(Self { x, y, u, v, mask })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn u(&self) -> &[f64] {
        &self.u
    }

    pub fn v(&self) -> &[f64] {
        &self.v
    }

    /// `true` 表示无效矢量
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// 按行遍历 `(x, y, u, v, invalid)`
    pub fn vectors(&self) -> impl Iterator<Item = (f64, f64, f64, f64, bool)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.u)
            .zip(&self.v)
            .zip(&self.mask)
            .map(|((((&x, &y), &u), &v), &m)| (x, y, u, v, m))
    }

    /// 矢量数量
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// 无效矢量数量
    pub fn invalid_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// 所有不重复的 x 坐标（升序），即网格的列坐标
    pub fn grid_columns(&self) -> Vec<f64> {
        unique_sorted(&self.x)
    }

    /// 所有不重复的 y 坐标（升序），即网格的行坐标
    pub fn grid_rows(&self) -> Vec<f64> {
        unique_sorted(&self.y)
    }
}

fn unique_sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out.dedup();
    out
}

/// 保存格式选项
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// 最小字段宽度
    pub width: usize,
    /// 小数位数
    pub precision: usize,
    /// 列分隔符
    pub delimiter: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            width: 8,
            precision: 4,
            delimiter: b'\t',
        }
    }
}

/// 单行记录
#[derive(Debug, Deserialize)]
struct FieldRow {
    x: f64,
    y: f64,
    u: f64,
    v: f64,
    mask: f64,
}

/// 保存流场到文本文件
pub fn save(field: &FlowField, output_path: &Path, options: &SaveOptions) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output_path)?;

    let fmt = |v: f64| format!("{:>w$.p$}", v, w = options.width, p = options.precision);

    for (x, y, u, v, invalid) in field.vectors() {
        let mask = if invalid { 1.0 } else { 0.0 };
        wtr.write_record([fmt(x), fmt(y), fmt(u), fmt(v), fmt(mask)])?;
    }

    wtr.flush().map_err(|e| PivError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 读取空白分隔（空格或制表符，可连续出现）的流场文件
pub fn load(input_path: &Path) -> Result<FlowField> {
    load_with_delimiter(input_path, b' ')
}

/// 读取指定分隔符的流场文件，`#` 开头的行视为注释
///
/// 分隔符为空格或制表符时，任意长度的空白都算一个分隔，
/// 因此 `save` 以任何空白分隔符写出的文件都能读回。
pub fn load_with_delimiter(input_path: &Path, delimiter: u8) -> Result<FlowField> {
    let text = fs::read_to_string(input_path).map_err(|e| PivError::FileReadError {
        path: input_path.display().to_string(),
        source: e,
    })?;

    let (text, delimiter) = if delimiter.is_ascii_whitespace() {
        (collapse_whitespace(&text), b' ')
    } else {
        (text, delimiter)
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let (mut x, mut y, mut u, mut v, mut mask) =
        (Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for (line, row) in rdr.deserialize::<FieldRow>().enumerate() {
        let row = row.map_err(|e| PivError::ParseError {
            path: input_path.display().to_string(),
            line: e.position().map(|p| p.line() as usize).unwrap_or(line + 1),
            reason: e.to_string(),
        })?;
        x.push(row.x);
        y.push(row.y);
        u.push(row.u);
        v.push(row.v);
        mask.push(row.mask != 0.0);
    }
    let field = FlowField::new(x, y, u, v, mask)?;

    log::debug!(
        "Loaded {} vectors ({} invalid) from {}",
        field.len(),
        field.invalid_count(),
        input_path.display()
    );

    Ok(field)
}

/// 每行的连续空白压缩为单个空格，行数保持不变以便报错行号准确
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if let Some(first) = tokens.next() {
            out.push_str(first);
            for token in tokens {
                out.push(' ');
                out.push_str(token);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_field() -> FlowField {
        FlowField::new(
            vec![16.0, 32.0, 16.0, 32.0],
            vec![16.0, 16.0, 32.0, 32.0],
            vec![1.25, -0.5, 0.0, 3.14159],
            vec![0.0, 2.0, -1.0, 0.5],
            vec![false, true, false, false],
        )
        .unwrap()
    }

    #[test]
    fn test_save_default_format() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("exp1_0000.txt");
        save(&sample_field(), &path, &SaveOptions::default()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(first, " 16.0000\t 16.0000\t  1.2500\t  0.0000\t  0.0000");
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_load_saved_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("field.txt");
        save(&sample_field(), &path, &SaveOptions::default()).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.mask(), &[false, true, false, false]);
        assert_eq!(loaded.invalid_count(), 1);
        assert!((loaded.u()[3] - 3.1416).abs() < 1e-9);
    }

    #[test]
    fn test_custom_delimiter() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("field.csv");
        let options = SaveOptions {
            width: 0,
            precision: 3,
            delimiter: b',',
        };
        save(&sample_field(), &path, &options).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("16.000,16.000,1.250,0.000,0.000"));
        assert_eq!(load_with_delimiter(&path, b',').unwrap().len(), 4);
    }

    #[test]
    fn test_space_delimited_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("field.txt");
        let options = SaveOptions {
            delimiter: b' ',
            ..Default::default()
        };
        save(&sample_field(), &path, &options).unwrap();

        // `%8.4f` 加空格分隔会产生连续空格
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(" 16.0000  16.0000"));

        for loaded in [load(&path).unwrap(), load_with_delimiter(&path, b' ').unwrap()] {
            assert_eq!(loaded.len(), 4);
            assert_eq!(loaded.x(), &[16.0, 32.0, 16.0, 32.0]);
            assert_eq!(loaded.v(), &[0.0, 2.0, -1.0, 0.5]);
            assert_eq!(loaded.invalid_count(), 1);
        }
    }

    #[test]
    fn test_load_mixed_whitespace() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mixed.txt");
        fs::write(&path, "# x y u v mask\n1 \t 2\t\t3   4 0\n\n  5 6 7 8 1  \n").unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.x(), &[1.0, 5.0]);
        assert_eq!(loaded.mask(), &[false, true]);
        // 制表符分隔的读取同样接受空格
        assert_eq!(load_with_delimiter(&path, b'\t').unwrap(), loaded);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load(&tmp.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, PivError::FileReadError { .. }));
    }

    #[test]
    fn test_mismatched_columns() {
        let err = FlowField::new(vec![1.0], vec![], vec![1.0], vec![1.0], vec![false]).unwrap_err();
        assert!(matches!(err, PivError::InvalidArgument(_)));

        // 列只能经由 `new` 构造，遍历和保存不会越界
        let empty = FlowField::default();
        assert_eq!(empty.vectors().count(), 0);
        let tmp = TempDir::new().unwrap();
        save(&empty, &tmp.path().join("empty.txt"), &SaveOptions::default()).unwrap();
    }

    #[test]
    fn test_vectors_row_order() {
        let rows: Vec<_> = sample_field().vectors().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], (32.0, 16.0, -0.5, 2.0, true));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.txt");
        fs::write(&path, "1\t2\t3\t4\t0\n1\tx\t3\t4\t0\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PivError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_grid_axes() {
        let field = sample_field();
        assert_eq!(field.grid_columns(), vec![16.0, 32.0]);
        assert_eq!(field.grid_rows(), vec![16.0, 32.0]);
    }
}

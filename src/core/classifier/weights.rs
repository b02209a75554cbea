// src/core/classifier/weights.rs
//
// Layer weight matrices and the text weight-file format.
//
// A weight file is a sequence of blocks:
//
//     <rows> <cols>
//     <cols floats>      (rows lines)
//     <blank line>
//
// Parsing stops at end of file or at a blank line where a header is expected.
// Any weight data after such a blank line is an error.

use log::debug;
use std::path::Path;

use crate::error::{Result, WhistlerError};

/// Weights of one layer transition: one row per output unit, one column per
/// input unit plus a leading bias column.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    weights: Vec<Vec<f64>>,
}

impl Layer {
    pub fn new(weights: Vec<Vec<f64>>) -> Result<Self> {
        let cols = weights.first().map_or(0, |r| r.len());
        if weights.is_empty() || cols < 2 {
            return Err(WhistlerError::WeightFileFormat(format!(
                "layer must have at least one row and two columns, got {}x{}",
                weights.len(),
                cols
            )));
        }
        if let Some(bad) = weights.iter().position(|r| r.len() != cols) {
            return Err(WhistlerError::WeightFileFormat(format!(
                "layer row {} has {} values, expected {}",
                bad,
                weights[bad].len(),
                cols
            )));
        }
        Ok(Self { weights })
    }

    /// Output units
    pub fn rows(&self) -> usize {
        self.weights.len()
    }

    /// Input units plus the bias column
    pub fn cols(&self) -> usize {
        self.weights[0].len()
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }
}

/// Ordered layer weights of a feed-forward network
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    layers: Vec<Layer>,
}

impl WeightSet {
    /// Checks that each layer consumes the previous layer's outputs plus a
    /// bias unit.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(WhistlerError::WeightFileFormat("no layers defined".to_string()));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[1].cols() != pair[0].rows() + 1 {
                return Err(WhistlerError::WeightFileFormat(format!(
                    "layer {} has {} columns but layer {} produces {} outputs (+1 bias expected)",
                    i + 1,
                    pair[1].cols(),
                    i,
                    pair[0].rows()
                )));
            }
        }
        Ok(Self { layers })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let set = Self::parse(&text)?;
        debug!(
            "Loaded {} layers from {} (input size {})",
            set.layers.len(),
            path.display(),
            set.input_len()
        );
        Ok(set)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
        let mut layers = Vec::new();

        while let Some((header_line, header)) = lines.next() {
            let tokens: Vec<&str> = header.split_whitespace().collect();
            if tokens.is_empty() {
                if let Some((line_no, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
                    return Err(WhistlerError::WeightFileFormat(format!(
                        "line {}: weight data after blank line {} where a layer header was expected",
                        line_no, header_line
                    )));
                }
                break;
            }

            let (rows, cols) = parse_header(&tokens, header_line)?;
            let mut weights = Vec::with_capacity(rows);
            for r in 0..rows {
                let (line_no, line) = lines.next().ok_or_else(|| {
                    WhistlerError::WeightFileFormat(format!(
                        "layer declared at line {} as {}x{} ends after {} rows",
                        header_line, rows, cols, r
                    ))
                })?;
                weights.push(parse_row(line, cols, line_no)?);
            }

            match lines.next() {
                Some((line_no, sep)) if !sep.trim().is_empty() => {
                    return Err(WhistlerError::WeightFileFormat(format!(
                        "line {}: expected blank separator after {} rows, found data",
                        line_no, rows
                    )));
                }
                Some(_) => {}
                None => {
                    layers.push(Layer::new(weights)?);
                    break;
                }
            }
            layers.push(Layer::new(weights)?);
        }

        Self::new(layers)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of input values the first layer consumes, without the bias
    pub fn input_len(&self) -> usize {
        self.layers[0].cols() - 1
    }

    /// Number of output units of the last layer
    pub fn output_len(&self) -> usize {
        self.layers[self.layers.len() - 1].rows()
    }
}

fn parse_header(tokens: &[&str], line_no: usize) -> Result<(usize, usize)> {
    let bad = || {
        WhistlerError::WeightFileFormat(format!(
            "line {}: expected \"<rows> <cols>\", found {:?}",
            line_no,
            tokens.join(" ")
        ))
    };
    if tokens.len() != 2 {
        return Err(bad());
    }
    let rows: usize = tokens[0].parse().map_err(|_| bad())?;
    let cols: usize = tokens[1].parse().map_err(|_| bad())?;
    if rows == 0 || cols == 0 {
        return Err(bad());
    }
    Ok((rows, cols))
}

fn parse_row(line: &str, cols: usize, line_no: usize) -> Result<Vec<f64>> {
    let values = line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| {
                WhistlerError::WeightFileFormat(format!("line {}: invalid number {:?}", line_no, tok))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != cols {
        return Err(WhistlerError::WeightFileFormat(format!(
            "line {}: expected {} values, found {}",
            line_no,
            cols,
            values.len()
        )));
    }
    Ok(values)
}

/// Render weights in the text format read by [`WeightSet::parse`]
pub fn format_weights(set: &WeightSet) -> String {
    let mut out = String::new();
    for layer in set.layers() {
        out.push_str(&format!("{} {}\n", layer.rows(), layer.cols()));
        for row in layer.weights() {
            let line: Vec<String> = row.iter().map(|w| format!("{}", w)).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

//! Input data contract: axes, metric channels and shape validation.
//!
//! A [`HeatmapData`] snapshot is replaced wholesale on every data update;
//! the engine never mutates it. Validation happens up front, before any
//! buffer rebuild, so a bad snapshot leaves prior valid state untouched.

use crate::error::{Error, Result};
use trueno::Vector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of hierarchical label slots per key-axis boundary.
pub const LABEL_LEVELS: usize = 4;

/// One metric matrix: `[time_bucket][key_bucket]`.
pub type Matrix = Vec<Vec<f64>>;

/// One boundary on the key axis: the raw key plus its hierarchical labels,
/// coarsest first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyAxisEntry {
    /// Raw boundary key.
    pub key: String,
    /// Hierarchical classification of the key range starting here.
    pub labels: [Option<String>; LABEL_LEVELS],
}

/// Tag selecting one of the five parallel metric matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Channel {
    /// Combined read/write traffic.
    Integration,
    /// Bytes read per bucket.
    ReadBytes,
    /// Bytes written per bucket.
    #[default]
    WrittenBytes,
    /// Keys read per bucket.
    ReadKeys,
    /// Keys written per bucket.
    WrittenKeys,
}

impl Channel {
    /// All channels, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Integration,
        Self::ReadBytes,
        Self::WrittenBytes,
        Self::ReadKeys,
        Self::WrittenKeys,
    ];

    /// Wire name of the channel.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integration => "integration",
            Self::ReadBytes => "read_bytes",
            Self::WrittenBytes => "written_bytes",
            Self::ReadKeys => "read_keys",
            Self::WrittenKeys => "written_keys",
        }
    }

    /// Display unit for values of this channel.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Integration | Self::ReadBytes | Self::WrittenBytes => "bytes/min",
            Self::ReadKeys | Self::WrittenKeys => "keys/min",
        }
    }
}

/// The five parallel metric matrices.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSet {
    /// Combined read/write traffic.
    pub integration: Matrix,
    /// Bytes read per bucket.
    pub read_bytes: Matrix,
    /// Bytes written per bucket.
    pub written_bytes: Matrix,
    /// Keys read per bucket.
    pub read_keys: Matrix,
    /// Keys written per bucket.
    pub written_keys: Matrix,
}

impl ChannelSet {
    /// Borrow the matrix for a channel tag.
    #[must_use]
    pub fn get(&self, channel: Channel) -> &Matrix {
        match channel {
            Channel::Integration => &self.integration,
            Channel::ReadBytes => &self.read_bytes,
            Channel::WrittenBytes => &self.written_bytes,
            Channel::ReadKeys => &self.read_keys,
            Channel::WrittenKeys => &self.written_keys,
        }
    }
}

/// A fully materialized heatmap snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeatmapData {
    /// Strictly increasing bucket boundaries, unix milliseconds.
    /// Bucket `i` spans `[time_axis[i], time_axis[i+1])`.
    pub time_axis: Vec<i64>,
    /// Key-axis boundaries; bucket `k` spans `[key_axis[k], key_axis[k+1])`.
    pub key_axis: Vec<KeyAxisEntry>,
    /// Metric matrices, one per channel, identical dimensions.
    pub data: ChannelSet,
}

impl HeatmapData {
    /// Number of time buckets.
    #[must_use]
    pub fn time_buckets(&self) -> usize {
        self.time_axis.len().saturating_sub(1)
    }

    /// Number of key buckets.
    #[must_use]
    pub fn key_buckets(&self) -> usize {
        self.key_axis.len().saturating_sub(1)
    }

    /// Validate axes and all five channel matrices.
    ///
    /// # Errors
    ///
    /// [`Error::DataShape`] when an axis is too short, the time axis is not
    /// strictly increasing, or any matrix is ragged or mis-sized;
    /// [`Error::DomainValue`] when any cell is negative or non-finite.
    pub fn validate(&self) -> Result<()> {
        if self.time_axis.len() < 2 {
            return Err(Error::DataShape(format!(
                "time axis needs at least 2 boundaries, got {}",
                self.time_axis.len()
            )));
        }
        if self.key_axis.len() < 2 {
            return Err(Error::DataShape(format!(
                "key axis needs at least 2 boundaries, got {}",
                self.key_axis.len()
            )));
        }
        for pair in self.time_axis.windows(2) {
            if pair[1] <= pair[0] {
                return Err(Error::DataShape(format!(
                    "time axis not strictly increasing at {} -> {}",
                    pair[0], pair[1]
                )));
            }
        }

        let rows = self.time_buckets();
        let cols = self.key_buckets();
        for channel in Channel::ALL {
            let matrix = self.data.get(channel);
            if matrix.len() != rows {
                return Err(Error::DataShape(format!(
                    "channel {} has {} rows, expected {rows}",
                    channel.name(),
                    matrix.len()
                )));
            }
            for (t, row) in matrix.iter().enumerate() {
                if row.len() != cols {
                    return Err(Error::DataShape(format!(
                        "channel {} row {t} has {} columns, expected {cols}",
                        channel.name(),
                        row.len()
                    )));
                }
                for (k, &value) in row.iter().enumerate() {
                    if !value.is_finite() || value < 0.0 {
                        return Err(Error::DomainValue {
                            channel: channel.name(),
                            time_idx: t,
                            key_idx: k,
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Maximum cell value of a channel, the dynamic range of its color
    /// mapping. Zero for an all-zero channel.
    #[must_use]
    pub fn channel_max(&self, channel: Channel) -> f64 {
        let matrix = self.data.get(channel);
        matrix
            .iter()
            .map(|row| {
                let v: Vec<f32> = row.iter().map(|&x| x as f32).collect();
                Vector::from_vec(v).max().unwrap_or(0.0)
            })
            .fold(0.0_f32, f32::max)
            .into()
    }

    /// Marginal sums per time bucket (aggregated across keys).
    #[must_use]
    pub fn time_marginals(&self, channel: Channel) -> Vec<f32> {
        self.data
            .get(channel)
            .iter()
            .map(|row| row.iter().sum::<f64>() as f32)
            .collect()
    }

    /// Marginal sums per key bucket (aggregated across time).
    #[must_use]
    pub fn key_marginals(&self, channel: Channel) -> Vec<f32> {
        let matrix = self.data.get(channel);
        (0..self.key_buckets())
            .map(|k| matrix.iter().map(|row| row[k]).sum::<f64>() as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::sample_data;

    #[test]
    fn test_valid_data_passes() {
        let data = sample_data(4, 3);
        assert!(data.validate().is_ok());
        assert_eq!(data.time_buckets(), 4);
        assert_eq!(data.key_buckets(), 3);
    }

    #[test]
    fn test_short_axis_rejected() {
        let mut data = sample_data(4, 3);
        data.time_axis.truncate(1);
        assert!(matches!(data.validate(), Err(Error::DataShape(_))));
    }

    #[test]
    fn test_non_increasing_time_axis_rejected() {
        let mut data = sample_data(4, 3);
        data.time_axis[2] = data.time_axis[1];
        assert!(matches!(data.validate(), Err(Error::DataShape(_))));
    }

    #[test]
    fn test_ragged_matrix_rejected() {
        let mut data = sample_data(4, 3);
        data.data.read_keys[1].pop();
        assert!(matches!(data.validate(), Err(Error::DataShape(_))));
    }

    #[test]
    fn test_wrong_row_count_rejected() {
        let mut data = sample_data(4, 3);
        data.data.integration.pop();
        assert!(matches!(data.validate(), Err(Error::DataShape(_))));
    }

    #[test]
    fn test_negative_cell_rejected() {
        let mut data = sample_data(4, 3);
        data.data.written_bytes[2][1] = -5.0;
        let err = data.validate().unwrap_err();
        match err {
            Error::DomainValue {
                channel,
                time_idx,
                key_idx,
                ..
            } => {
                assert_eq!(channel, "written_bytes");
                assert_eq!((time_idx, key_idx), (2, 1));
            }
            other => panic!("expected DomainValue, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_cell_rejected() {
        let mut data = sample_data(4, 3);
        data.data.read_bytes[0][0] = f64::NAN;
        assert!(matches!(data.validate(), Err(Error::DomainValue { .. })));
    }

    #[test]
    fn test_channel_max() {
        let mut data = sample_data(4, 3);
        data.data.written_bytes[3][2] = 999.0;
        assert!((data.channel_max(Channel::WrittenBytes) - 999.0).abs() < 0.5);
    }

    #[test]
    fn test_channel_max_all_zero() {
        let mut data = sample_data(4, 3);
        for row in &mut data.data.written_bytes {
            row.fill(0.0);
        }
        assert_eq!(data.channel_max(Channel::WrittenBytes), 0.0);
    }

    #[test]
    fn test_marginals_shapes() {
        let data = sample_data(4, 3);
        assert_eq!(data.time_marginals(Channel::Integration).len(), 4);
        assert_eq!(data.key_marginals(Channel::Integration).len(), 3);
    }

    #[test]
    fn test_marginal_sums_agree() {
        let data = sample_data(5, 4);
        let x: f32 = data.time_marginals(Channel::WrittenBytes).iter().sum();
        let y: f32 = data.key_marginals(Channel::WrittenBytes).iter().sum();
        assert!((x - y).abs() < 1.0);
    }

    #[test]
    fn test_channel_units() {
        assert_eq!(Channel::WrittenBytes.unit(), "bytes/min");
        assert_eq!(Channel::ReadKeys.unit(), "keys/min");
        assert_eq!(Channel::WrittenBytes.name(), "written_bytes");
    }
}

pub mod color_scale;
pub mod data_mapper;
pub mod date_format;
pub mod layout;
pub mod number_format;
pub mod primitives;
pub mod scale;
pub mod scale_engine;
pub mod time_interval;
pub mod time_scale;
pub mod types;
pub mod value_scale;

pub use color_scale::{ColorScale, PALETTE};
pub use data_mapper::{DataMapper, MappedData, RawRecord, ValueModifier, records_from_json};
pub use date_format::{DateFormat, multi_scale_label};
pub use layout::{
    AspectBucket, AspectRatio, Layout, LayoutEngine, LayoutPolicy, Margins, TickCounts,
};
pub use number_format::NumberFormat;
pub use scale::LinearScale;
pub use scale_engine::{ChartScales, ScaleEngine};
pub use time_interval::{TimeInterval, TimeUnit, time_ticks};
pub use time_scale::TimeScale;
pub use types::{Dimension, Record, Series, SeriesPoint, Viewport};
pub use value_scale::{ValueScale, Y_AXIS_PADDING};

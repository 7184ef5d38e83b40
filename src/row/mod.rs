//! Notification row engine: height prediction, template recycling and
//! item presentation.

pub mod height;
pub mod measure;
pub mod metrics;
pub mod pool;
pub mod presenter;
pub mod progress;
pub mod template;

pub use height::HeightOracle;
pub use measure::MeasureSurface;
pub use metrics::{RowLayout, FIXED_CHROME, LINE_HEIGHT, ROW_HEIGHT};
pub use pool::{SharedActions, TemplatePool};
pub use presenter::{BindSession, ItemPresenter};
pub use progress::{ProgressBar, ProgressMode};
pub use template::{
    Button, ClassList, RowContainer, RowElements, RowRegion, RowTemplate, TabStop, TemplateId,
    ToolbarEntry,
};

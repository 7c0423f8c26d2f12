// Domain models: queries, samples, series, introspection, wire responses

mod introspection;
mod query;
mod response;
mod sample;
mod series;

pub use introspection::{DeviceStats, InterfaceDescriptor, InterfaceVersion, IntrospectionEntry};
pub use query::{DataQuery, QueryDataRequest, SeriesQuery, TimeRange};
pub use response::{
    DataResponse, HealthCheck, HealthStatus, QueryDataResponse, QueryDataResponseBody,
    ResourceResponse,
};
pub use sample::{NumericSample, RawSample, SampleValue};
pub use series::{FRAME_NAME, Field, FieldValues, Frame, TIME_FIELD, TimeSeries, VALUE_FIELD};

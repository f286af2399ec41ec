pub mod layout;
pub mod ops;
pub mod spec;
pub mod view;

pub use layout::ParameterLayout;
pub use spec::ModelSpec;
pub use view::ModelView;

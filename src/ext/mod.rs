mod normalized_path_ext;

pub use normalized_path_ext::NormalizedPathExt;

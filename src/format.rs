use clap::builder::PossibleValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text, Json,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Format::Text, Format::Json]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Format::Text => PossibleValue::new("Text").help("colored swatches, this is default"),
            Format::Json => PossibleValue::new("Json").help("swatches as JSON"),
        })
    }
}

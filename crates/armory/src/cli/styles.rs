use armoryapp::commands::MessageLevel;
use console::Style;

pub fn message(level: &MessageLevel) -> Style {
    match level {
        MessageLevel::Info => Style::new().dim(),
        MessageLevel::Success => Style::new().green(),
        MessageLevel::Warning => Style::new().yellow(),
        MessageLevel::Error => Style::new().red(),
    }
}

pub fn index() -> Style {
    Style::new().yellow()
}

pub fn name() -> Style {
    Style::new().bold()
}

pub fn reference() -> Style {
    Style::new().color256(245).italic()
}

pub fn missing() -> Style {
    Style::new().red().italic()
}

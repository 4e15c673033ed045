//! Presentation state of the host page.
//!
//! The DOM itself is out of scope; this is the state a page template would
//! render: which option buttons carry the `selected` class, the value text
//! next to each category, the shareable link box and the designer chrome.

use haven_domain::{ModelProfile, OptionCategory, OptionValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyIcon {
    #[default]
    Copy,
    Checkmark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionButton {
    pub value: OptionValue,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub category: OptionCategory,
    pub label: String,
    /// Text shown beside the label; the last value marked selected.
    pub value_text: Option<OptionValue>,
    pub options: Vec<OptionButton>,
}

impl CategoryView {
    #[must_use]
    pub fn selected(&self) -> Option<&OptionValue> {
        self.options.iter().find(|option| option.selected).map(|option| &option.value)
    }
}

/// The floating panel opened by a designer-mode hotspot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DesignerPanel {
    pub visible: bool,
    /// The one category section shown inside the panel.
    pub category: Option<OptionCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostView {
    pub categories: Vec<CategoryView>,
    pub current_link: String,
    pub copy_icon: CopyIcon,
    /// The preview is fullscreen while designer mode is on.
    pub fullscreen: bool,
    pub panel: DesignerPanel,
}

impl HostView {
    /// One section per category, in profile order, nothing selected yet.
    #[must_use]
    pub fn for_profile(profile: &ModelProfile) -> Self {
        let categories = profile
            .categories
            .iter()
            .map(|category| CategoryView {
                category: category.category.clone(),
                label: category.label.clone(),
                value_text: None,
                options: category
                    .choices
                    .iter()
                    .map(|value| OptionButton { value: value.clone(), selected: false })
                    .collect(),
            })
            .collect();
        Self { categories, ..Self::default() }
    }

    #[must_use]
    pub fn category(&self, category: &str) -> Option<&CategoryView> {
        self.categories.iter().find(|view| view.category == category)
    }

    /// Marks `value` selected within `category` and every sibling unselected.
    /// The value text follows only when a button carries `value`.
    pub fn mark_selected(&mut self, category: &str, value: &str) {
        let Some(view) = self.categories.iter_mut().find(|view| view.category == category) else {
            return;
        };
        for option in &mut view.options {
            option.selected = option.value == value;
            if option.selected {
                view.value_text = Some(option.value.clone());
            }
        }
    }

    /// Shows `link` and resets the copy icon.
    pub fn set_link(&mut self, link: String) {
        self.current_link = link;
        self.copy_icon = CopyIcon::Copy;
    }

    pub fn show_panel(&mut self, category: OptionCategory) {
        self.panel = DesignerPanel { visible: true, category: Some(category) };
    }

    pub fn hide_panel(&mut self) {
        self.panel = DesignerPanel::default();
    }
}

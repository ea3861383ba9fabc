//! Hierarchical menu navigation.
//!
//! The menu is a tagged state: either the root category row or a submenu
//! list belonging to one category. Submenu cursors are always clamped to the
//! list length the current [`MenuContext`] reports, so an out-of-range index
//! cannot be constructed through the navigation API.

/// Root menu categories, in on-screen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE")]
pub enum Category {
    Attack,
    Act,
    Item,
    Mercy,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Attack,
        Category::Act,
        Category::Item,
        Category::Mercy,
    ];

    pub const fn index(self) -> usize {
        match self {
            Category::Attack => 0,
            Category::Act => 1,
            Category::Item => 2,
            Category::Mercy => 3,
        }
    }

    /// Category at `index`, clamped to the last category.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// Mercy submenu entries.
pub mod mercy {
    pub const SPARE: usize = 0;
    pub const FLEE: usize = 1;
    pub const CHOICES: usize = 2;
}

/// External facts that decide submenu list lengths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuContext {
    pub act_choices: usize,
    pub items: usize,
}

impl MenuContext {
    pub fn new(act_choices: usize, items: usize) -> Self {
        Self { act_choices, items }
    }

    /// Number of selectable entries in `category`'s submenu.
    ///
    /// Attack lists the single target. Item exposes one slot (the first
    /// item), or zero when the inventory is empty and a disabled placeholder
    /// is shown instead.
    pub fn choice_count(&self, category: Category) -> usize {
        match category {
            Category::Attack => 1,
            Category::Act => self.act_choices,
            Category::Item => self.items.min(1),
            Category::Mercy => mercy::CHOICES,
        }
    }
}

/// Cursor position in the menu hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MenuState {
    Root { category: Category },
    Submenu { category: Category, index: usize },
}

impl MenuState {
    pub const fn root(category: Category) -> Self {
        MenuState::Root { category }
    }

    pub const fn category(&self) -> Category {
        match *self {
            MenuState::Root { category } | MenuState::Submenu { category, .. } => category,
        }
    }

    /// Submenu cursor, or `None` at the root.
    pub const fn index(&self) -> Option<usize> {
        match *self {
            MenuState::Root { .. } => None,
            MenuState::Submenu { index, .. } => Some(index),
        }
    }

    pub const fn is_root(&self) -> bool {
        matches!(self, MenuState::Root { .. })
    }

    pub fn move_left(self) -> Self {
        match self {
            MenuState::Root { category } => {
                MenuState::root(Category::from_index(category.index().saturating_sub(1)))
            }
            other => other,
        }
    }

    pub fn move_right(self) -> Self {
        match self {
            MenuState::Root { category } => {
                MenuState::root(Category::from_index(category.index() + 1))
            }
            other => other,
        }
    }

    pub fn move_up(self, ctx: &MenuContext) -> Self {
        match self {
            MenuState::Submenu { category, index } => MenuState::Submenu {
                category,
                index: index.saturating_sub(1),
            }
            .clamped(ctx),
            other => other,
        }
    }

    pub fn move_down(self, ctx: &MenuContext) -> Self {
        match self {
            MenuState::Submenu { category, index } => MenuState::Submenu {
                category,
                index: index + 1,
            }
            .clamped(ctx),
            other => other,
        }
    }

    /// Enters the submenu of the selected category with the cursor on top.
    pub fn open(self) -> Self {
        MenuState::Submenu {
            category: self.category(),
            index: 0,
        }
    }

    /// Returns to the root row, keeping the selected category.
    pub fn close(self) -> Self {
        MenuState::root(self.category())
    }

    /// Pulls the submenu cursor back inside `[0, len - 1]` (or 0 when empty).
    pub fn clamped(self, ctx: &MenuContext) -> Self {
        match self {
            MenuState::Submenu { category, index } => {
                let last = ctx.choice_count(category).saturating_sub(1);
                MenuState::Submenu {
                    category,
                    index: index.min(last),
                }
            }
            other => other,
        }
    }
}

impl Default for MenuState {
    fn default() -> Self {
        MenuState::root(Category::Attack)
    }
}

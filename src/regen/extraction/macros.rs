//! Macro registry and positional decomposition
//!
//! A member comment may open with a macro invocation:
//!
//!     Items,    // VECTOR(std::wstring, Items)
//!     Lookup,   // MAP(int, std::wstring, Lookup)
//!     Owner,    // GETSET_SPTR(Widget, Owner, nullptr, L"root")
//!
//! Only keywords present in the [`MacroRegistry`] are treated as macros; the registry is
//! built from configuration and classifies each keyword into a [`MacroType`] up front. The
//! arguments are then assigned to descriptor fields by position, according to the
//! category's layout.

use crate::regen::error::{ConfigError, ParserError, ParserResult};
use crate::regen::model::{MacroCategory, MacroType, PropertyDescriptor};
use crate::regen::scanning::{split_arguments, Argument, TextCursor};
use std::collections::BTreeMap;
use tracing::warn;

/// Keywords known when configuration does not override them
pub const DEFAULT_MACRO_KEYWORDS: &[&str] = &[
    "GET",
    "GETSET",
    "GET_VALIDATE",
    "GETSET_VALIDATE",
    "GET_SPTR",
    "GETSET_SPTR",
    "GET_SPTR_NULL",
    "GETSET_SPTR_NULL",
    "VECTOR",
    "VECTOR_SPTR",
    "SET",
    "SET_SPTR",
    "MAP",
    "MAP_SPTR_R",
    "ORDERED_MAP",
    "ORDERED_MAP_SPTR_R",
    "MANAGER_SPTR",
    "MANAGER_SPTR_NULL",
    "MANAGER_SPTR_PARENT",
    "ACTION",
    "ACTION_WITH_ARG_SPTR",
];

/// Quote characters that make a `)` inside a macro invocation literal
const MACRO_QUOTES: [char; 2] = ['"', '\''];

/// Known macro keywords and their categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroRegistry {
    keywords: BTreeMap<String, MacroType>,
}

impl MacroRegistry {
    /// Build a registry, classifying every keyword by its shape.
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = BTreeMap::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            let mut cursor = TextCursor::new(keyword, 0);
            if cursor.identifier() != Some(keyword) {
                return Err(ConfigError::InvalidMacroKeyword(keyword.to_string()));
            }
            let macro_type = MacroType::classify(keyword)
                .ok_or_else(|| ConfigError::UnknownMacroShape(keyword.to_string()))?;
            registry.insert(keyword.to_string(), macro_type);
        }
        Ok(Self { keywords: registry })
    }

    pub fn lookup(&self, keyword: &str) -> Option<MacroType> {
        self.keywords.get(keyword).copied()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords in alphabetical order with their categories.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MacroType)> {
        self.keywords
            .iter()
            .map(|(keyword, macro_type)| (keyword.as_str(), *macro_type))
    }
}

impl Default for MacroRegistry {
    fn default() -> Self {
        let keywords = DEFAULT_MACRO_KEYWORDS
            .iter()
            .filter_map(|keyword| {
                MacroType::classify(keyword).map(|macro_type| (keyword.to_string(), macro_type))
            })
            .collect();
        Self { keywords }
    }
}

/// Parse the invocation under the cursor into `property`.
///
/// The cursor must sit on `keyword`; on return it sits just past the closing `)`.
pub(crate) fn parse_invocation(
    cursor: &mut TextCursor<'_>,
    source: &str,
    keyword: &str,
    macro_type: MacroType,
    property: &mut PropertyDescriptor,
) -> ParserResult<()> {
    cursor.advance(keyword.len());
    let open_offset = cursor.offset();
    let group = cursor.balanced(&MACRO_QUOTES).ok_or_else(|| {
        ParserError::syntax(
            source,
            open_offset,
            format!("expected `)` to close `{keyword}(`"),
        )
    })?;
    let close_offset = open_offset + group.len() - 1;
    let inner = &group[1..group.len() - 1];
    let arguments = split_arguments(inner, open_offset + 1);

    property.raw_macro = format!("{keyword}{group}");
    property.macro_type = macro_type;

    let slots = Slots {
        source,
        keyword,
        arguments: &arguments,
        close_offset,
    };
    match macro_type.category() {
        MacroCategory::None => Ok(()),
        MacroCategory::Scalar => decompose_scalar(&slots, macro_type, property),
        MacroCategory::Collection => decompose_collection(&slots, macro_type, property),
        MacroCategory::Manager => decompose_manager(&slots, property),
        MacroCategory::Action => decompose_action(&slots, property),
    }
}

struct Slots<'a> {
    source: &'a str,
    keyword: &'a str,
    arguments: &'a [Argument<'a>],
    close_offset: usize,
}

impl Slots<'_> {
    fn optional(&self, index: usize) -> Option<&str> {
        self.arguments
            .get(index)
            .map(|argument| argument.text)
            .filter(|text| !text.is_empty())
    }

    /// A slot that must be present. The error names the delimiter the slot should precede:
    /// `)` for the first slot, `,` for any later one.
    fn required(&self, index: usize, what: &str) -> ParserResult<&str> {
        if let Some(text) = self.optional(index) {
            return Ok(text);
        }
        let (offset, delimiter) = match self.arguments.get(index) {
            Some(argument) => (argument.offset, if index == 0 { ")" } else { "," }),
            None if index == 0 => (self.close_offset, ")"),
            None => (self.close_offset, ","),
        };
        Err(ParserError::syntax(
            self.source,
            offset,
            format!(
                "`{}` expects {what} before `{delimiter}`",
                self.keyword
            ),
        ))
    }

    fn rest(&self, from: usize) -> Vec<String> {
        self.arguments
            .iter()
            .skip(from)
            .map(|argument| argument.text.to_string())
            .collect()
    }

    fn warn_extra(&self, max: usize, property: &PropertyDescriptor) {
        if self.arguments.len() > max {
            warn!(
                keyword = self.keyword,
                member = %property.enum_name,
                extra = self.arguments.len() - max,
                "ignoring extra macro arguments"
            );
        }
    }

    fn name_or(&self, index: usize, property: &PropertyDescriptor) -> String {
        self.optional(index)
            .unwrap_or(&property.enum_name)
            .to_string()
    }
}

fn decompose_scalar(
    slots: &Slots<'_>,
    macro_type: MacroType,
    property: &mut PropertyDescriptor,
) -> ParserResult<()> {
    property.type1 = slots.required(0, "a type")?.to_string();
    property.property_name = slots.name_or(1, property);
    property.default_value = slots.optional(2).unwrap_or_default().to_string();

    if macro_type.is_validated() {
        property.validate = slots.optional(3).map(str::to_string);
        slots.warn_extra(4, property);
    } else if macro_type.is_object() {
        property.initialize_arguments = slots.rest(3);
    } else {
        slots.warn_extra(3, property);
    }
    Ok(())
}

fn decompose_collection(
    slots: &Slots<'_>,
    macro_type: MacroType,
    property: &mut PropertyDescriptor,
) -> ParserResult<()> {
    property.type1 = slots.required(0, "an element type")?.to_string();
    let mut next = 1;
    if macro_type.is_map() {
        property.type2 = slots.required(1, "a value type")?.to_string();
        next = 2;
    }
    property.property_name = slots.name_or(next, property);
    property.default_value = slots.optional(next + 1).unwrap_or_default().to_string();
    slots.warn_extra(next + 2, property);
    Ok(())
}

fn decompose_manager(slots: &Slots<'_>, property: &mut PropertyDescriptor) -> ParserResult<()> {
    property.type1 = slots.required(0, "a manager type")?.to_string();
    property.property_name = slots.name_or(1, property);
    property.initialize_arguments = slots.rest(2);
    Ok(())
}

fn decompose_action(slots: &Slots<'_>, property: &mut PropertyDescriptor) -> ParserResult<()> {
    property.property_name = slots.required(0, "a property name")?.to_string();
    property.type1 = slots.optional(1).unwrap_or_default().to_string();
    slots.warn_extra(2, property);
    Ok(())
}

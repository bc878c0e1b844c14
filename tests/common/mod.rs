#![allow(dead_code)]

use phpantom_latte::{
    ClassInfo, ConstantInfo, InMemoryIndex, LatteFile, LatteSettings, MethodInfo, NodeId,
    PropertyInfo, SyntaxKind, TreeBuilder, Visibility,
};

/// Install a test subscriber once per test binary.  `RUST_LOG=trace`
/// shows the inference steps of a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ─── Template DSL ───────────────────────────────────────────────────────────

/// Builds template trees the way the Latte parser shapes them.
///
/// ```ignore
/// let file = Tpl::new()
///     .tag("foreach", "$items as $item")
///     .echo("$item->name")
///     .close("foreach")
///     .build();
/// ```
pub struct Tpl {
    builder: TreeBuilder,
}

impl Default for Tpl {
    fn default() -> Self {
        Self::new()
    }
}

impl Tpl {
    pub fn new() -> Self {
        init_tracing();
        Self {
            builder: TreeBuilder::new("test.latte"),
        }
    }

    /// Plain HTML text.
    pub fn html(mut self, text: &str) -> Self {
        self.builder.token(SyntaxKind::Text, text);
        self
    }

    /// `{name php}`, or `{name}` when `php` is empty.
    pub fn tag(mut self, name: &str, php: &str) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::MacroOpenTag);
        b.token(SyntaxKind::MacroTagOpen, "{");
        b.token(SyntaxKind::MacroName, name);
        if !php.is_empty() {
            b.token(SyntaxKind::Whitespace, " ");
            b.start_node(SyntaxKind::MacroContent);
            lex_php(b, php, name);
            b.finish_node();
        }
        b.token(SyntaxKind::MacroTagClose, "}");
        b.finish_node();
        self
    }

    /// Name-less echo tag `{php}`.
    pub fn echo(mut self, php: &str) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::MacroOpenTag);
        b.token(SyntaxKind::MacroTagOpen, "{");
        b.start_node(SyntaxKind::MacroContent);
        lex_php(b, php, "");
        b.finish_node();
        b.token(SyntaxKind::MacroTagClose, "}");
        b.finish_node();
        self
    }

    /// `{=php}` or `{_php}`.
    pub fn shorthand(mut self, short: &str, php: &str) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::MacroOpenTag);
        b.token(SyntaxKind::MacroTagOpen, "{");
        b.token(SyntaxKind::MacroShortName, short);
        b.start_node(SyntaxKind::MacroContent);
        lex_php(b, php, short);
        b.finish_node();
        b.token(SyntaxKind::MacroTagClose, "}");
        b.finish_node();
        self
    }

    /// `{/name}`.
    pub fn close(mut self, name: &str) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::MacroCloseTag);
        b.token(SyntaxKind::MacroCloseTagOpen, "{/");
        b.token(SyntaxKind::MacroName, name);
        b.token(SyntaxKind::MacroTagClose, "}");
        b.finish_node();
        self
    }

    /// `{/}`.
    pub fn bare_close(mut self) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::MacroCloseTag);
        b.token(SyntaxKind::MacroCloseTagOpen, "{/");
        b.token(SyntaxKind::MacroTagClose, "}");
        b.finish_node();
        self
    }

    /// `name="php"` on an HTML element, e.g. `n:foreach="$items as $item"`.
    pub fn n_attr(mut self, name: &str, php: &str) -> Self {
        let b = &mut self.builder;
        b.start_node(SyntaxKind::NetteAttr);
        b.token(SyntaxKind::HtmlAttrName, name);
        b.token(SyntaxKind::PhpDefinitionOperator, "=");
        b.start_node(SyntaxKind::NetteAttrValue);
        b.token(SyntaxKind::HtmlAttrQuote, "\"");
        let tag = name.strip_prefix("n:").unwrap_or(name);
        lex_php(b, php, tag);
        b.token(SyntaxKind::HtmlAttrQuote, "\"");
        b.finish_node();
        b.finish_node();
        self
    }

    pub fn build(self) -> LatteFile {
        self.builder.finish()
    }
}

// ─── PHP fragment lexer ─────────────────────────────────────────────────────

/// Open groups while lexing a fragment.
#[derive(Clone, Copy, PartialEq)]
enum Group {
    /// `foo(...)`: parens outside the `PhpMethodArgs` node.
    Args,
    /// `(...)`: parens inside the `PhpInBrackets` node.
    InBrackets,
    /// `[$a, $b]`: brackets inside the `PhpArrayOfVariables` node.
    Array,
    /// `Foo[]`, `$a[0]`: plain bracket tokens.
    Bracket,
}

/// Tags whose `|` separates union members instead of filters.
fn is_type_tag(tag: &str) -> bool {
    matches!(tag, "var" | "varType" | "default" | "templateType")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\\'
}

/// Emit one `PhpContent` for `php`, wrapped in `PhpForeach` for loops.
fn lex_php(b: &mut TreeBuilder, php: &str, tag: &str) {
    b.start_node(SyntaxKind::PhpContent);
    let foreach = tag == "foreach";
    if foreach {
        b.start_node(SyntaxKind::PhpForeach);
    }

    let chars: Vec<char> = php.chars().collect();
    let mut groups: Vec<Group> = Vec::new();
    let mut last: Option<SyntaxKind> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let rest: String = chars[i..].iter().collect();

        if c.is_whitespace() {
            let end = scan(&chars, i, |c| c.is_whitespace());
            b.token(SyntaxKind::Whitespace, &collect(&chars, i, end));
            i = end;
            continue;
        }

        if c == '$' {
            let end = scan(&chars, i + 1, is_word_char);
            let kind = if last == Some(SyntaxKind::PhpDoubleColon) {
                SyntaxKind::PhpStaticVariable
            } else {
                SyntaxKind::PhpVariable
            };
            b.start_node(kind);
            b.token(SyntaxKind::MacroArgsVar, &collect(&chars, i, end));
            b.finish_node();
            last = Some(kind);
            i = end;
            continue;
        }

        if c.is_ascii_digit() {
            let end = scan(&chars, i, |c| c.is_ascii_digit() || c == '.');
            b.token(SyntaxKind::PhpNumber, &collect(&chars, i, end));
            last = Some(SyntaxKind::PhpNumber);
            i = end;
            continue;
        }

        if is_word_char(c) {
            let end = scan(&chars, i, is_word_char);
            let word = collect(&chars, i, end);
            let called = chars.get(end) == Some(&'(');
            let kind = match last {
                _ if word == "as" => None,
                Some(SyntaxKind::PhpObjectOperator) if called => Some(SyntaxKind::PhpMethod),
                Some(SyntaxKind::PhpObjectOperator) => Some(SyntaxKind::PhpProperty),
                Some(SyntaxKind::PhpDoubleColon) if called => Some(SyntaxKind::PhpMethod),
                Some(SyntaxKind::PhpDoubleColon) => Some(SyntaxKind::PhpConstant),
                _ if called => Some(SyntaxKind::PhpMethod),
                _ if word.starts_with('\\') || word.starts_with(|c: char| c.is_uppercase()) => {
                    Some(SyntaxKind::PhpClass)
                }
                _ => None,
            };
            match kind {
                Some(kind) => {
                    let identifier = match kind {
                        SyntaxKind::PhpMethod => SyntaxKind::PhpMethodName,
                        SyntaxKind::PhpClass => SyntaxKind::PhpClassName,
                        _ => SyntaxKind::PhpIdentifier,
                    };
                    b.start_node(kind);
                    b.token(identifier, &word);
                    b.finish_node();
                    last = Some(kind);
                }
                None if word == "as" => {
                    b.token(SyntaxKind::PhpAs, &word);
                    last = Some(SyntaxKind::PhpAs);
                }
                None => {
                    b.token(SyntaxKind::PhpIdentifier, &word);
                    last = Some(SyntaxKind::PhpIdentifier);
                }
            }
            i = end;
            continue;
        }

        if c == '\'' || c == '"' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += 1;
            }
            end = (end + 1).min(chars.len());
            b.token(SyntaxKind::PhpString, &collect(&chars, i, end));
            last = Some(SyntaxKind::PhpString);
            i = end;
            continue;
        }

        let two = [
            ("->", SyntaxKind::PhpObjectOperator),
            ("::", SyntaxKind::PhpDoubleColon),
            ("=>", SyntaxKind::PhpDoubleArrow),
            ("==", SyntaxKind::PhpOperator),
        ];
        if let Some((text, kind)) = two.iter().find(|(text, _)| rest.starts_with(text)) {
            b.token(*kind, text);
            last = Some(*kind);
            i += 2;
            continue;
        }

        match c {
            '=' => {
                b.token(SyntaxKind::PhpDefinitionOperator, "=");
                last = Some(SyntaxKind::PhpDefinitionOperator);
            }
            ',' => {
                b.token(SyntaxKind::PhpComma, ",");
                last = Some(SyntaxKind::PhpComma);
            }
            '(' if last == Some(SyntaxKind::PhpMethod) => {
                b.token(SyntaxKind::PhpLeftBrace, "(");
                b.start_node(SyntaxKind::PhpMethodArgs);
                groups.push(Group::Args);
                last = Some(SyntaxKind::PhpLeftBrace);
            }
            '(' => {
                b.start_node(SyntaxKind::PhpInBrackets);
                b.token(SyntaxKind::PhpLeftBrace, "(");
                groups.push(Group::InBrackets);
                last = Some(SyntaxKind::PhpLeftBrace);
            }
            ')' => {
                match groups.pop() {
                    Some(Group::Args) => {
                        b.finish_node();
                        b.token(SyntaxKind::PhpRightBrace, ")");
                    }
                    Some(Group::InBrackets) => {
                        b.token(SyntaxKind::PhpRightBrace, ")");
                        b.finish_node();
                    }
                    _ => panic!("unbalanced `)` in {php:?}"),
                }
                last = Some(SyntaxKind::PhpRightBrace);
            }
            '[' if matches!(
                last,
                Some(
                    SyntaxKind::PhpVariable
                        | SyntaxKind::PhpStaticVariable
                        | SyntaxKind::PhpProperty
                        | SyntaxKind::PhpClass
                        | SyntaxKind::PhpIdentifier
                        | SyntaxKind::PhpRightBrace
                        | SyntaxKind::PhpRightBracket
                )
            ) =>
            {
                b.token(SyntaxKind::PhpLeftBracket, "[");
                groups.push(Group::Bracket);
                last = Some(SyntaxKind::PhpLeftBracket);
            }
            '[' => {
                b.start_node(SyntaxKind::PhpArrayOfVariables);
                b.token(SyntaxKind::PhpLeftBracket, "[");
                groups.push(Group::Array);
                last = Some(SyntaxKind::PhpLeftBracket);
            }
            ']' => {
                b.token(SyntaxKind::PhpRightBracket, "]");
                match groups.pop() {
                    Some(Group::Array) => b.finish_node(),
                    Some(Group::Bracket) => {}
                    _ => panic!("unbalanced `]` in {php:?}"),
                }
                last = Some(SyntaxKind::PhpRightBracket);
            }
            '|' if !is_type_tag(tag) => {
                b.token(SyntaxKind::MacroModifierPipe, "|");
                let end = scan(&chars, i + 1, is_word_char);
                b.start_node(SyntaxKind::MacroModifier);
                b.token(SyntaxKind::MacroFilters, &collect(&chars, i + 1, end));
                b.finish_node();
                last = Some(SyntaxKind::MacroModifier);
                i = end;
                continue;
            }
            other => {
                b.token(SyntaxKind::PhpOperator, &other.to_string());
                last = Some(SyntaxKind::PhpOperator);
            }
        }
        i += 1;
    }

    assert!(groups.is_empty(), "unclosed group in {php:?}");
    if foreach {
        b.finish_node();
    }
    b.finish_node();
}

fn scan(chars: &[char], from: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = from;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    end
}

fn collect(chars: &[char], from: usize, to: usize) -> String {
    chars[from..to].iter().collect()
}

// ─── Node lookup ────────────────────────────────────────────────────────────

/// The `n`-th (0-based) node of `kind` whose text is `text`.
pub fn nth_node(file: &LatteFile, kind: SyntaxKind, text: &str, n: usize) -> NodeId {
    file.nodes_of_kind(kind)
        .filter(|&id| file.node_text(id) == text)
        .nth(n)
        .unwrap_or_else(|| panic!("no {kind:?} #{n} with text {text:?}"))
}

/// The `n`-th `$name` variable occurrence.
pub fn var(file: &LatteFile, name: &str, n: usize) -> NodeId {
    nth_node(file, SyntaxKind::PhpVariable, name, n)
}

/// The last `$name` variable occurrence.
pub fn last_var(file: &LatteFile, name: &str) -> NodeId {
    file.nodes_of_kind(SyntaxKind::PhpVariable)
        .filter(|&id| file.node_text(id) == name)
        .last()
        .unwrap_or_else(|| panic!("no variable {name:?}"))
}

pub fn property(file: &LatteFile, name: &str, n: usize) -> NodeId {
    nth_node(file, SyntaxKind::PhpProperty, name, n)
}

pub fn method(file: &LatteFile, name: &str, n: usize) -> NodeId {
    nth_node(file, SyntaxKind::PhpMethod, name, n)
}

pub fn constant(file: &LatteFile, name: &str, n: usize) -> NodeId {
    nth_node(file, SyntaxKind::PhpConstant, name, n)
}

pub fn class(file: &LatteFile, name: &str, n: usize) -> NodeId {
    nth_node(file, SyntaxKind::PhpClass, name, n)
}

/// The `n`-th macro tag (open or close) in document order.
pub fn macro_tag(file: &LatteFile, n: usize) -> NodeId {
    file.descendants(file.root())
        .filter(|&id| file.kind(id).is_macro_tag())
        .nth(n)
        .unwrap_or_else(|| panic!("no macro tag #{n}"))
}

// ─── Fixtures ───────────────────────────────────────────────────────────────

fn method_info(name: &str, return_type: Option<&str>) -> MethodInfo {
    MethodInfo {
        name: name.to_string(),
        return_type: return_type.map(str::to_string),
        is_static: false,
        visibility: Visibility::Public,
    }
}

fn property_info(name: &str, type_hint: Option<&str>, visibility: Visibility) -> PropertyInfo {
    PropertyInfo {
        name: name.to_string(),
        type_hint: type_hint.map(str::to_string),
        is_static: false,
        visibility,
    }
}

pub const PRODUCT: &str = "App\\Model\\Product";
pub const CATEGORY: &str = "App\\Model\\Category";
pub const TEMPLATE: &str = "App\\Presenters\\ProductTemplate";

/// A small shop model:
///
/// - `Product`: `id`, `name`, `price`, `category`, `tags`, static
///   `$currency`, constant `STATUS_ACTIVE`, `getCategory()`,
///   `withPrice(): static`
/// - `Category`: `title`, `products`, `getProducts()`, `getParent()`,
///   constant `ROOT`
/// - `ProductTemplate`: the `{templateType}` class with public
///   `product` and `categories`, a protected `secret` and a static
///   `$counter`
pub fn shop_index() -> InMemoryIndex {
    let mut product = ClassInfo::new(PRODUCT);
    product.properties = vec![
        property_info("id", Some("int"), Visibility::Public),
        property_info("name", Some("string"), Visibility::Public),
        property_info("price", Some("?float"), Visibility::Public),
        property_info("category", Some("\\App\\Model\\Category"), Visibility::Public),
        property_info("tags", Some("string[]"), Visibility::Public),
        PropertyInfo {
            is_static: true,
            ..property_info("currency", Some("string"), Visibility::Public)
        },
    ];
    product.constants = vec![ConstantInfo {
        name: "STATUS_ACTIVE".to_string(),
        type_hint: Some("int".to_string()),
        visibility: Visibility::Public,
    }];
    product.methods = vec![
        method_info("getCategory", Some("\\App\\Model\\Category")),
        method_info("withPrice", Some("static")),
        method_info("render", None),
    ];

    let mut category = ClassInfo::new(CATEGORY);
    category.properties = vec![
        property_info("title", Some("string"), Visibility::Public),
        property_info("products", Some("\\App\\Model\\Product[]"), Visibility::Public),
    ];
    category.constants = vec![ConstantInfo {
        name: "ROOT".to_string(),
        type_hint: None,
        visibility: Visibility::Public,
    }];
    category.methods = vec![
        method_info("getProducts", Some("array<int, \\App\\Model\\Product>")),
        method_info("getParent", Some("?\\App\\Model\\Category")),
    ];

    let mut template = ClassInfo::new(TEMPLATE);
    template.properties = vec![
        property_info("product", Some("\\App\\Model\\Product"), Visibility::Public),
        property_info("categories", Some("\\App\\Model\\Category[]"), Visibility::Public),
        property_info("secret", Some("string"), Visibility::Protected),
        PropertyInfo {
            is_static: true,
            ..property_info("counter", Some("int"), Visibility::Public)
        },
    ];

    let mut index = InMemoryIndex::new();
    index.add_class(product);
    index.add_class(category);
    index.add_class(template);
    index
}

/// Core settings plus a few host-injected variables and functions.
pub fn shop_settings() -> LatteSettings {
    LatteSettings::default()
        .with_variable("basePath", "string")
        .with_variable("$user", "\\App\\Model\\Product")
        .with_function("currentCategory", "\\App\\Model\\Category")
        .with_function("isLinkCurrent", "bool")
}

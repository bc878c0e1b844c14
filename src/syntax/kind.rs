//! Node-kind taxonomy for parsed Latte templates.
//!
//! The external scanner produces a flat token stream which a merging
//! pass folds into the composite nodes listed here.  Every kind the
//! analysis cares about is a variant of [`SyntaxKind`], so matching on a
//! node's kind is exhaustive and new kinds show up as compile errors in
//! the places that need to handle them.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // ─── Composite nodes ────────────────────────────────────────────────
    /// The root of every tree.
    File,
    /// `{name ...}` or `{= ...}` or `{$expr}`.
    MacroOpenTag,
    /// `{/name}` or `{/}`.
    MacroCloseTag,
    /// Everything between the tag name and the closing `}`.
    MacroContent,
    /// One PHP-like expression fragment inside [`SyntaxKind::MacroContent`]
    /// or an `n:` attribute value.
    PhpContent,
    /// `$name`
    PhpVariable,
    /// `$name` after `::`
    PhpStaticVariable,
    /// `name` followed by an argument list.
    PhpMethod,
    /// `name` after `->`
    PhpProperty,
    /// `NAME` after `::`
    PhpConstant,
    /// A (possibly namespaced) class name.
    PhpClass,
    /// The arguments between the parentheses of a call, without the
    /// parentheses themselves.
    PhpMethodArgs,
    /// `$items as $key => $value` inside `{foreach}` / `n:foreach`.
    PhpForeach,
    /// `[$a, $b]` destructuring group.
    PhpArrayOfVariables,
    /// `( ... )` grouping, parentheses included.
    PhpInBrackets,
    /// `|filter` (the pipe itself is a sibling token).
    MacroModifier,
    /// `n:name="value"`
    NetteAttr,
    /// The quoted value of an `n:` attribute, quotes included.
    NetteAttrValue,

    // ─── Tokens ─────────────────────────────────────────────────────────
    /// Plain template text / HTML outside of tags.
    Text,
    Whitespace,
    /// `{`
    MacroTagOpen,
    /// `{/`
    MacroCloseTagOpen,
    /// `}`
    MacroTagClose,
    /// The tag name right after the opener, e.g. `foreach`.
    MacroName,
    /// Short tag names such as `=` or `_`.
    MacroShortName,
    /// Variable text including the sigil, e.g. `$item`.
    MacroArgsVar,
    /// Method or function name.
    PhpMethodName,
    /// Property / constant name or any other bare identifier.
    PhpIdentifier,
    /// Class name text, e.g. `\App\Model\Product`.
    PhpClassName,
    /// Filter name after the pipe.
    MacroFilters,
    /// The `|` in front of a filter.
    MacroModifierPipe,
    /// `::`
    PhpDoubleColon,
    /// `->` or `?->`
    PhpObjectOperator,
    /// `as`
    PhpAs,
    /// `=>`
    PhpDoubleArrow,
    /// `=`
    PhpDefinitionOperator,
    /// `(`
    PhpLeftBrace,
    /// `)`
    PhpRightBrace,
    /// `[`
    PhpLeftBracket,
    /// `]`
    PhpRightBracket,
    /// `,`
    PhpComma,
    /// Any other operator or punctuation (`;`, `<`, `|` in a type, ...).
    PhpOperator,
    PhpNumber,
    PhpString,
    /// HTML attribute name, e.g. `n:for`.
    HtmlAttrName,
    /// `"` or `'` around an attribute value.
    HtmlAttrQuote,
}

impl SyntaxKind {
    /// Whether this kind is a token (a leaf that owns text directly).
    pub fn is_token(self) -> bool {
        !matches!(
            self,
            SyntaxKind::File
                | SyntaxKind::MacroOpenTag
                | SyntaxKind::MacroCloseTag
                | SyntaxKind::MacroContent
                | SyntaxKind::PhpContent
                | SyntaxKind::PhpVariable
                | SyntaxKind::PhpStaticVariable
                | SyntaxKind::PhpMethod
                | SyntaxKind::PhpProperty
                | SyntaxKind::PhpConstant
                | SyntaxKind::PhpClass
                | SyntaxKind::PhpMethodArgs
                | SyntaxKind::PhpForeach
                | SyntaxKind::PhpArrayOfVariables
                | SyntaxKind::PhpInBrackets
                | SyntaxKind::MacroModifier
                | SyntaxKind::NetteAttr
                | SyntaxKind::NetteAttrValue
        )
    }

    /// `{...}` open and close tags.
    pub fn is_macro_tag(self) -> bool {
        matches!(self, SyntaxKind::MacroOpenTag | SyntaxKind::MacroCloseTag)
    }

    /// `::` or `->`, the operators that continue a member-access chain.
    pub fn is_access_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::PhpDoubleColon | SyntaxKind::PhpObjectOperator
        )
    }
}

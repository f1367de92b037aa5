//! Built-in rule sets for the dashboard page source.
//!
//! Each rule is an anchor pattern plus replacement, applied to every
//! non-overlapping match in one pass. Anchors are exact text of the page as it
//! stood before the burns view existed; a rule whose anchor is absent does
//! nothing.

use regex::{NoExpand, Regex};
use std::borrow::Cow;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub enum Replacement {
  /// Inserted verbatim
  Literal(&'static str),

  /// May reference capture groups as `${1}`; a literal `$` is written `$$`
  Template(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct PatchRule {
  pub label: &'static str,
  pub pattern: &'static str,
  pub replacement: Replacement,
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
  pub label: &'static str,
  pub matches: usize,
}

impl PatchRule {
  /// Apply this rule to `content`, returning the new text and the number of
  /// replaced matches
  pub fn apply<'a>(&self, content: &'a str) -> Result<(Cow<'a, str>, usize), regex::Error> {
    let anchor = Regex::new(self.pattern)?;
    let matches = anchor.find_iter(content).count();
    if matches == 0 {
      debug!("Anchor for '{}' not found, leaving content unchanged", self.label);
      return Ok((Cow::Borrowed(content), 0));
    }

    let patched = match self.replacement {
      Replacement::Literal(text) => anchor.replace_all(content, NoExpand(text)),
      Replacement::Template(template) => anchor.replace_all(content, template),
    };
    Ok((patched, matches))
  }
}

/// Apply `rules` in order, each to the output of the previous one
pub fn apply_rules(content: &str, rules: &[PatchRule]) -> Result<(String, Vec<RuleOutcome>), regex::Error> {
  let mut current = content.to_string();
  let mut outcomes = Vec::with_capacity(rules.len());
  for rule in rules {
    let (patched, matches) = rule.apply(&current)?;
    if matches > 0 {
      current = patched.into_owned();
    }
    outcomes.push(RuleOutcome { label: rule.label, matches });
  }
  Ok((current, outcomes))
}

/// View-mode types, URL parameter and state for the burns view
pub const BURNS_VIEW: &[PatchRule] = &[
  PatchRule {
    label: "view mode URL type includes burns",
    pattern: r"const urlView = searchParams\.get\('view'\) as 'chart' \| 'fees' \| 'holders' \| null;",
    replacement: Replacement::Literal(
      "const urlView = searchParams.get('view') as 'chart' | 'fees' | 'holders' | 'burns' | null;",
    ),
  },
  PatchRule {
    label: "burns timeframe URL parameter",
    pattern: r"const urlHoldersTimeframe = searchParams\.get\('holdersTimeframe'\) as '1D' \| '7D' \| '30D' \| '90D' \| 'ALL' \| null;",
    replacement: Replacement::Literal(
      "const urlHoldersTimeframe = searchParams.get('holdersTimeframe') as '1D' | '7D' | '30D' | '90D' | 'ALL' | null;\n  \
       const urlBurnsTimeframe = searchParams.get('burnsTimeframe') as '7D' | '30D' | '90D' | 'ALL' | null;",
    ),
  },
  PatchRule {
    label: "burns timeframe validation list",
    pattern: r"const validHoldersTimeframes = \['1D', '7D', '30D', '90D', 'ALL'\];",
    replacement: Replacement::Literal(
      "const validHoldersTimeframes = ['1D', '7D', '30D', '90D', 'ALL'];\n  \
       const validBurnsTimeframes = ['7D', '30D', '90D', 'ALL'];",
    ),
  },
  PatchRule {
    label: "initial view mode accepts burns",
    pattern: r"const initialViewMode = urlView && \['chart', 'fees', 'holders'\]\.includes\(urlView\) \? urlView : 'chart';",
    replacement: Replacement::Literal(
      "const initialViewMode = urlView && ['chart', 'fees', 'holders', 'burns'].includes(urlView) ? urlView : 'chart';",
    ),
  },
  PatchRule {
    label: "initial burns timeframe",
    pattern: r"const initialHoldersTimeframe = urlHoldersTimeframe && validHoldersTimeframes\.includes\(urlHoldersTimeframe\) \? urlHoldersTimeframe : '30D';",
    replacement: Replacement::Literal(
      "const initialHoldersTimeframe = urlHoldersTimeframe && validHoldersTimeframes.includes(urlHoldersTimeframe) ? urlHoldersTimeframe : '30D';\n  \
       const initialBurnsTimeframe = urlBurnsTimeframe && validBurnsTimeframes.includes(urlBurnsTimeframe) ? urlBurnsTimeframe : '30D';",
    ),
  },
  PatchRule {
    label: "view mode state type includes burns",
    pattern: r"const \[viewMode, setViewModeState\] = useState<'chart' \| 'fees' \| 'holders'>\(initialViewMode\);",
    replacement: Replacement::Literal(
      "const [viewMode, setViewModeState] = useState<'chart' | 'fees' | 'holders' | 'burns'>(initialViewMode);",
    ),
  },
  PatchRule {
    label: "burns timeframe state",
    pattern: r"const \[holdersTimeframe, setHoldersTimeframeState\] = useState<'1D' \| '7D' \| '30D' \| '90D' \| 'ALL'>\(initialHoldersTimeframe\);",
    replacement: Replacement::Literal(
      "const [holdersTimeframe, setHoldersTimeframeState] = useState<'1D' | '7D' | '30D' | '90D' | 'ALL'>(initialHoldersTimeframe);\n  \
       const [burnsTimeframe, setBurnsTimeframeState] = useState<'7D' | '30D' | '90D' | 'ALL'>(initialBurnsTimeframe);",
    ),
  },
];

/// URL sync, view switching and the burns timeframe setter
pub const BURNS_INTEGRATION: &[PatchRule] = &[
  PatchRule {
    label: "URL sync accepts burns view",
    pattern: r"if \(urlView && \['chart', 'fees', 'holders'\]\.includes\(urlView\)\) \{",
    replacement: Replacement::Literal("if (urlView && ['chart', 'fees', 'holders', 'burns'].includes(urlView)) {"),
  },
  PatchRule {
    label: "URL sync for burns timeframe",
    pattern: r"(?s)if \(urlHoldersTimeframe && validHoldersTimeframes\.includes\(urlHoldersTimeframe\)\) \{\s+setHoldersTimeframeState\(urlHoldersTimeframe\);\s+\}",
    replacement: Replacement::Literal(
      "if (urlHoldersTimeframe && validHoldersTimeframes.includes(urlHoldersTimeframe)) {
      setHoldersTimeframeState(urlHoldersTimeframe);
    }
    if (urlBurnsTimeframe && validBurnsTimeframes.includes(urlBurnsTimeframe)) {
      setBurnsTimeframeState(urlBurnsTimeframe);
    }",
    ),
  },
  PatchRule {
    label: "setViewMode signature includes burns",
    pattern: r"const setViewMode = \(newViewMode: 'chart' \| 'fees' \| 'holders'\) => \{",
    replacement: Replacement::Literal(
      "const setViewMode = (newViewMode: 'chart' | 'fees' | 'holders' | 'burns') => {",
    ),
  },
  PatchRule {
    label: "setViewMode burns branch",
    pattern: r"\} else if \(newViewMode === 'holders'\) \{\s+params\.delete\('chartTimeframe'\);\s+params\.delete\('feesTimeframe'\);\s+params\.set\('holdersTimeframe', holdersTimeframe\);",
    replacement: Replacement::Literal(
      "} else if (newViewMode === 'holders') {
      params.delete('chartTimeframe');
      params.delete('feesTimeframe');
      params.delete('burnsTimeframe');
      params.set('holdersTimeframe', holdersTimeframe);
    } else if (newViewMode === 'burns') {
      params.delete('chartTimeframe');
      params.delete('feesTimeframe');
      params.delete('holdersTimeframe');
      params.set('burnsTimeframe', burnsTimeframe);",
    ),
  },
  PatchRule {
    label: "chart branch clears burns timeframe",
    pattern: r"\} else if \(newViewMode === 'chart'\) \{\s+params\.set\('chartTimeframe', timeframe\);\s+params\.delete\('feesTimeframe'\);\s+params\.delete\('holdersTimeframe'\);",
    replacement: Replacement::Literal(
      "} else if (newViewMode === 'chart') {
      params.set('chartTimeframe', timeframe);
      params.delete('feesTimeframe');
      params.delete('holdersTimeframe');
      params.delete('burnsTimeframe');",
    ),
  },
  PatchRule {
    label: "setBurnsTimeframe function",
    pattern: r"(?s)(const setHoldersTimeframe = \(newHoldersTimeframe: '1D' \| '7D' \| '30D' \| '90D' \| 'ALL'\) => \{[^}]+\};)",
    replacement: Replacement::Template(
      "${1}\n\n  // Update URL when burns timeframe changes\n  \
       const setBurnsTimeframe = (newBurnsTimeframe: '7D' | '30D' | '90D' | 'ALL') => {\n    \
       setBurnsTimeframeState(newBurnsTimeframe);\n    \
       const params = new URLSearchParams(searchParams.toString());\n    \
       params.set('burnsTimeframe', newBurnsTimeframe);\n    \
       const tokenSlug = currentProject?.slug || 'zera';\n    \
       router.push(`/$${tokenSlug}?$${params.toString()}`, { scroll: false });\n  \
       };",
    ),
  },
];

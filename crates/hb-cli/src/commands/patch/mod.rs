/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! `hb patch`: best-effort textual substitution on the dashboard page source

pub mod rules;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use rules::{apply_rules, PatchRule, BURNS_INTEGRATION, BURNS_VIEW};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleSetName {
  /// View-mode types, URL parameter and state for the burns view
  BurnsView,
  /// URL sync, view switching and the burns timeframe setter
  BurnsIntegration,
}

impl RuleSetName {
  pub fn rules(self) -> &'static [PatchRule] {
    match self {
      RuleSetName::BurnsView => BURNS_VIEW,
      RuleSetName::BurnsIntegration => BURNS_INTEGRATION,
    }
  }
}

#[derive(Args, Debug)]
pub struct PatchArgs {
  /// Page source file to rewrite in place
  #[arg(short, long)]
  target: PathBuf,

  /// Rule set to apply
  #[arg(short, long, value_enum, default_value = "burns-view")]
  rules: RuleSetName,
}

pub fn execute(args: PatchArgs) -> Result<()> {
  let content = fs::read_to_string(&args.target)
    .with_context(|| format!("Failed to read {}", args.target.display()))?;

  let (patched, outcomes) = apply_rules(&content, args.rules.rules())?;
  for outcome in &outcomes {
    debug!("{}: {} match(es)", outcome.label, outcome.matches);
  }

  fs::write(&args.target, patched)
    .with_context(|| format!("Failed to write {}", args.target.display()))?;

  info!("✅ Applied all changes successfully!");
  println!("Changes made:");
  for (i, rule) in args.rules.rules().iter().enumerate() {
    println!("{}. ✅ {}", i + 1, rule.label);
  }
  println!("\nFile updated successfully!");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use rules::RuleOutcome;
  use tempfile::TempDir;

  const PAGE: &str = include_str!("fixtures/page_before_burns.tsx");

  #[derive(Debug, PartialEq, Eq)]
  enum SecondRun {
    NoOp,
    Changes,
  }

  /// Apply a rule to the fixture, then again to its own output
  fn second_run(rule: &PatchRule) -> SecondRun {
    let (once, matches) = rule.apply(PAGE).unwrap();
    assert_eq!(matches, 1, "anchor of '{}' missing from fixture", rule.label);
    let once = once.into_owned();
    let (twice, _) = rule.apply(&once).unwrap();
    if twice == once {
      SecondRun::NoOp
    } else {
      SecondRun::Changes
    }
  }

  #[test]
  fn test_burns_view_second_application() {
    // rules that append a line keep their anchor and append it again
    let expected = [
      SecondRun::NoOp,
      SecondRun::Changes,
      SecondRun::Changes,
      SecondRun::NoOp,
      SecondRun::Changes,
      SecondRun::NoOp,
      SecondRun::Changes,
    ];
    let actual: Vec<SecondRun> = BURNS_VIEW.iter().map(second_run).collect();
    assert_eq!(actual, expected);
  }

  #[test]
  fn test_burns_integration_second_application() {
    let expected = [
      SecondRun::NoOp,
      SecondRun::Changes,
      SecondRun::NoOp,
      SecondRun::NoOp,
      SecondRun::Changes,
      SecondRun::Changes,
    ];
    let actual: Vec<SecondRun> = BURNS_INTEGRATION.iter().map(second_run).collect();
    assert_eq!(actual, expected);
  }

  #[test]
  fn test_duplicate_line_after_second_burns_view_run() {
    let (once, _) = apply_rules(PAGE, BURNS_VIEW).unwrap();
    let (twice, _) = apply_rules(&once, BURNS_VIEW).unwrap();
    assert_eq!(once.matches("const validBurnsTimeframes").count(), 1);
    assert_eq!(twice.matches("const validBurnsTimeframes").count(), 2);
    assert_eq!(twice.matches("'holders' | 'burns' | null").count(), 1);
  }

  #[test]
  fn test_full_patch_sequence() {
    let (view, view_outcomes) = apply_rules(PAGE, BURNS_VIEW).unwrap();
    let (page, integration_outcomes) = apply_rules(&view, BURNS_INTEGRATION).unwrap();

    assert!(view_outcomes.iter().chain(&integration_outcomes).all(|o| o.matches == 1));
    assert!(page.contains(
      "const [burnsTimeframe, setBurnsTimeframeState] = useState<'7D' | '30D' | '90D' | 'ALL'>(initialBurnsTimeframe);"
    ));
    assert!(page.contains(
      "    if (urlBurnsTimeframe && validBurnsTimeframes.includes(urlBurnsTimeframe)) {\n      setBurnsTimeframeState(urlBurnsTimeframe);\n    }"
    ));
    assert!(page.contains(
      "    } else if (newViewMode === 'burns') {\n      params.delete('chartTimeframe');\n      params.delete('feesTimeframe');\n      params.delete('holdersTimeframe');\n      params.set('burnsTimeframe', burnsTimeframe);\n    } else if (newViewMode === 'chart') {"
    ));
    assert!(page.contains(
      "    router.replace('?' + params.toString());\n  };\n\n  // Update URL when burns timeframe changes\n  const setBurnsTimeframe = (newBurnsTimeframe: '7D' | '30D' | '90D' | 'ALL') => {\n"
    ));
    assert!(page.contains("router.push(`/${tokenSlug}?${params.toString()}`, { scroll: false });\n  };"));
  }

  #[test]
  fn test_braces_in_setter_body_defeat_the_anchor() {
    let page = PAGE.replace(
      "router.replace('?' + params.toString());\n  };\n\n  return null;",
      "router.push(`/${tokenSlug}?${params.toString()}`, { scroll: false });\n  };\n\n  return null;",
    );
    let (patched, outcomes) = apply_rules(&page, &BURNS_INTEGRATION[5..]).unwrap();
    assert_eq!(outcomes, vec![RuleOutcome { label: BURNS_INTEGRATION[5].label, matches: 0 }]);
    assert_eq!(patched, page);
  }

  #[test]
  fn test_execute_rewrites_target() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("page.tsx");
    fs::write(&target, PAGE).unwrap();

    execute(PatchArgs { target: target.clone(), rules: RuleSetName::BurnsView }).unwrap();

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("const urlBurnsTimeframe = searchParams.get('burnsTimeframe')"));
  }

  #[test]
  fn test_execute_leaves_unrelated_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("other.tsx");
    fs::write(&target, "export const x = 1;\n").unwrap();

    execute(PatchArgs { target: target.clone(), rules: RuleSetName::BurnsIntegration }).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "export const x = 1;\n");
  }

  #[test]
  fn test_execute_missing_target() {
    let dir = TempDir::new().unwrap();
    let args = PatchArgs { target: dir.path().join("missing.tsx"), rules: RuleSetName::BurnsView };
    assert!(execute(args).is_err());
  }
}

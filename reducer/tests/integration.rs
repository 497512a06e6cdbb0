use reducer::cleanup::strip_empty_conditionals;
use reducer::mappack::{self, MapEntry};
use reducer::{ReduceError, ReduceEvent, Reduction, SymbolEnvironment, reduce_source};
use rms::document::Node;
use rms::parser::Parser;

fn reduce(source: &str) -> Reduction {
    let mut env = SymbolEnvironment::with_default_seeds();
    reduce_source(source, &mut env, |_, _| 0).expect("reduction failed")
}

fn reduced_text(source: &str) -> String {
    reduce(source).text
}

/// Run only the conditional pass, without the final empty-pair cleanup.
fn reduce_conditions(source: &str) -> (String, Vec<ReduceEvent>) {
    let parser = Parser::new(source.to_string(), 0);
    let script = parser.parse_conditions().expect("parse failed");
    let mut env = SymbolEnvironment::with_default_seeds();
    let mut events = Vec::new();
    let document = reducer::condition::reduce(script.document, &mut env, &mut events);
    (document.to_string(), events)
}

// --- random blocks ---

#[test]
fn balanced_block_unchanged() {
    let src = "start_random\npercent_chance 40\nX\npercent_chance 60\nY\nend_random";
    assert_eq!(reduced_text(src), src);
}

#[test]
fn exhausted_branch_pruned_and_block_collapsed() {
    let src = "start_random\npercent_chance 100\nX\npercent_chance 10\nY\nend_random";
    let result = reduce(src);
    assert_eq!(result.text, "X");
    assert_eq!(
        result.events,
        vec![
            ReduceEvent::UnreachablePercentChance { weight: 10 },
            ReduceEvent::CollapsedRandomBlock,
        ]
    );
}

#[test]
fn surviving_weights_and_order_preserved() {
    let src = "start_random\npercent_chance 30\nA\npercent_chance 20\nB\npercent_chance 50\nC\nend_random";
    assert_eq!(reduced_text(src), src);
}

#[test]
fn zero_weight_branch_dropped_silently() {
    let src = "start_random\npercent_chance 50\nA\npercent_chance 0\nB\npercent_chance 50\nC\nend_random";
    let result = reduce(src);
    assert_eq!(
        result.text,
        "start_random\npercent_chance 50\nA\npercent_chance 50\nC\nend_random"
    );
    assert!(result.events.is_empty());
}

#[test]
fn empty_branch_weight_still_counts() {
    // The 40% branch has no body and is dropped, but its weight still
    // exhausts the block, so the 10% branch is unreachable.
    let src = "start_random\npercent_chance 60\nA\npercent_chance 40\npercent_chance 10\nX\nend_random";
    let result = reduce(src);
    assert_eq!(
        result.text,
        "start_random\npercent_chance 60\nA\nend_random"
    );
    assert_eq!(
        result.events,
        vec![ReduceEvent::UnreachablePercentChance { weight: 10 }]
    );
}

#[test]
fn nested_blocks_collapse_inside_out() {
    let src = "start_random\npercent_chance 100\nstart_random\npercent_chance 100\nDEEP\nend_random\nend_random";
    let result = reduce(src);
    assert_eq!(result.text, "DEEP");
    assert_eq!(
        result.events,
        vec![
            ReduceEvent::CollapsedRandomBlock,
            ReduceEvent::CollapsedRandomBlock,
        ]
    );
}

#[test]
fn block_without_branches_degrades_to_content() {
    let src = "start_random\nA\nB\nend_random";
    assert_eq!(reduced_text(src), "A\nB");
}

#[test]
fn content_before_first_branch_dropped() {
    let src = "start_random\nL\npercent_chance 50\nA\npercent_chance 50\nB\nend_random";
    assert_eq!(
        reduced_text(src),
        "start_random\npercent_chance 50\nA\npercent_chance 50\nB\nend_random"
    );
}

#[test]
fn block_with_no_surviving_branch_emits_nothing() {
    let src = "keep\nstart_random\npercent_chance 0\nA\nend_random\nkeep2";
    assert_eq!(reduced_text(src), "keep\nkeep2");
}

// --- conditionals ---

#[test]
fn seeded_symbol_kept() {
    let src = "if TINY_MAP\nA\nendif";
    assert_eq!(reduced_text(src), src);
}

#[test]
fn unknown_symbol_emptied_header_kept() {
    let (text, events) = reduce_conditions("if UNKNOWN_FLAG\nA\nendif");
    assert_eq!(text, "if UNKNOWN_FLAG\nendif\n");
    assert_eq!(
        events,
        vec![ReduceEvent::UnreachableCondition {
            symbol: Some("UNKNOWN_FLAG".to_string()),
        }]
    );
}

#[test]
fn lone_empty_conditional_cleaned_from_final_text() {
    // The cleanup pass removes the emptied single-arm pair entirely.
    assert_eq!(reduced_text("if UNKNOWN_FLAG\nA\nendif"), "");
}

#[test]
fn else_arm_always_kept() {
    let result = reduce("if UNKNOWN_FLAG\nA\nelse\nB\nendif");
    assert_eq!(result.text, "if UNKNOWN_FLAG\nelse\nB\nendif");
    assert_eq!(
        result.events,
        vec![ReduceEvent::UnreachableCondition {
            symbol: Some("UNKNOWN_FLAG".to_string()),
        }]
    );
}

#[test]
fn reachable_elseif_kept() {
    let src = "if UNKNOWN_FLAG\nA\nelseif TINY_MAP\nB\nendif";
    assert_eq!(
        reduced_text(src),
        "if UNKNOWN_FLAG\nelseif TINY_MAP\nB\nendif"
    );
}

#[test]
fn define_reaches_later_conditions() {
    let src = "#define LATE_FLAG\nif LATE_FLAG\nA\nendif";
    assert_eq!(reduced_text(src), src);
}

#[test]
fn define_does_not_reach_earlier_conditions() {
    let (text, events) = reduce_conditions("if LATE_FLAG\nA\nendif\n#define LATE_FLAG");
    assert_eq!(text, "if LATE_FLAG\nendif\n#define LATE_FLAG\n");
    assert_eq!(
        events,
        vec![ReduceEvent::UnreachableCondition {
            symbol: Some("LATE_FLAG".to_string()),
        }]
    );
}

#[test]
fn define_inside_own_arm_counts() {
    // Reachability is decided when the arm closes, after its body has
    // been walked.
    let src = "if SELF_FLAG\n#define SELF_FLAG\nA\nendif";
    let (text, events) = reduce_conditions(src);
    assert_eq!(text, "if SELF_FLAG\n#define SELF_FLAG\nA\nendif\n");
    assert!(events.is_empty());
}

#[test]
fn define_inside_emptied_arm_still_registers() {
    let src = "if UNKNOWN_FLAG\n#define INNER_FLAG\nendif\nif INNER_FLAG\nB\nendif";
    let (text, events) = reduce_conditions(src);
    assert_eq!(text, "if UNKNOWN_FLAG\nendif\nif INNER_FLAG\nB\nendif\n");
    assert_eq!(
        events,
        vec![ReduceEvent::UnreachableCondition {
            symbol: Some("UNKNOWN_FLAG".to_string()),
        }]
    );
}

#[test]
fn nested_conditions_reduced_independently() {
    let (text, _) = reduce_conditions("if TINY_MAP\nif UNKNOWN_FLAG\nA\nendif\nB\nendif");
    assert_eq!(text, "if TINY_MAP\nif UNKNOWN_FLAG\nendif\nB\nendif\n");
}

#[test]
fn nested_empty_pair_cleaned_from_final_text() {
    let src = "if TINY_MAP\nif UNKNOWN_FLAG\nA\nendif\nB\nendif";
    assert_eq!(reduced_text(src), "if TINY_MAP\nB\nendif");
}

#[test]
fn extra_seed_symbols_apply() {
    let mut env = SymbolEnvironment::with_seeds(["CUSTOM_FLAG"]);
    let result = reduce_source("if CUSTOM_FLAG\nA\nendif", &mut env, |_, _| 0)
        .expect("reduction failed");
    assert_eq!(result.text, "if CUSTOM_FLAG\nA\nendif");
}

#[test]
fn defines_do_not_leak_between_documents() {
    assert_eq!(reduced_text("#define CROSS_FLAG"), "#define CROSS_FLAG");
    // A fresh document starts from the seed set only.
    assert_eq!(reduced_text("if CROSS_FLAG\nA\nendif"), "");
}

// --- whole-pipeline behavior ---

#[test]
fn reduction_is_idempotent() {
    let src = "start_random\npercent_chance 100\nA\npercent_chance 5\nB\nend_random\n\
               if TINY_MAP\nC\nelseif UNKNOWN_FLAG\nD\nelse\nE\nendif\n\
               #define LATE_FLAG\nif LATE_FLAG\nF\nendif";
    let once = reduced_text(src);
    assert_eq!(reduced_text(&once), once);
}

#[test]
fn comments_and_whitespace_normalized() {
    let src = "create_terrain GRASS /* big\nblock comment */ \n\n\n  1   2\t3";
    assert_eq!(reduced_text(src), "create_terrain GRASS\n1 2 3");
}

#[test]
fn inline_percent_chance_content_split() {
    let src = "start_random\npercent_chance 50 create_object GOLD\npercent_chance 50 create_object STONE\nend_random";
    assert_eq!(
        reduced_text(src),
        "start_random\npercent_chance 50\ncreate_object GOLD\npercent_chance 50\ncreate_object STONE\nend_random"
    );
}

#[test]
fn open_random_block_closed_at_end_of_input() {
    let result = reduce("start_random\npercent_chance 100\nX");
    assert_eq!(result.text, "X");
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message.contains("start_random"))
    );
}

#[test]
fn open_condition_closed_at_end_of_input() {
    let result = reduce("if TINY_MAP\nA");
    assert_eq!(result.text, "if TINY_MAP\nA\nendif");
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message.contains("endif"))
    );
}

#[test]
fn unbalanced_delimiters_warned_not_fatal() {
    let result = reduce("end_random\nfoo");
    assert_eq!(result.text, "end_random\nfoo");
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.message.contains("unbalanced"))
    );
}

#[test]
fn percent_chance_without_weight_is_an_error() {
    let mut env = SymbolEnvironment::with_default_seeds();
    let err = reduce_source("start_random\npercent_chance\nend_random", &mut env, |_, _| 0)
        .expect_err("expected a parse failure");
    assert!(matches!(err, ReduceError::Parse(_)));
}

#[test]
fn percent_chance_with_bad_weight_is_an_error() {
    let mut env = SymbolEnvironment::with_default_seeds();
    let err = reduce_source(
        "start_random\npercent_chance many\nX\nend_random",
        &mut env,
        |_, _| 0,
    )
    .expect_err("expected a parse failure");
    assert!(matches!(err, ReduceError::Parse(_)));
}

#[test]
fn if_without_symbol_is_an_error() {
    let mut env = SymbolEnvironment::with_default_seeds();
    let err = reduce_source("if\nA\nendif", &mut env, |_, _| 0)
        .expect_err("expected a parse failure");
    assert!(matches!(err, ReduceError::Parse(_)));
}

#[test]
fn define_without_name_is_an_error() {
    let mut env = SymbolEnvironment::with_default_seeds();
    let err =
        reduce_source("#define", &mut env, |_, _| 0).expect_err("expected a parse failure");
    assert!(matches!(err, ReduceError::Parse(_)));
}

#[test]
fn failed_document_does_not_affect_the_next() {
    let mut env = SymbolEnvironment::with_default_seeds();
    assert!(reduce_source("#define", &mut env, |_, _| 0).is_err());

    let mut env = SymbolEnvironment::with_default_seeds();
    let result = reduce_source("if TINY_MAP\nA\nendif", &mut env, |_, _| 0)
        .expect("second document should reduce");
    assert_eq!(result.text, "if TINY_MAP\nA\nendif");
}

// --- cleanup ---

#[test]
fn cleanup_removes_lone_empty_pairs() {
    assert_eq!(
        strip_empty_conditionals("if ANY_FLAG\nendif\nkeep\n"),
        "keep\n"
    );
}

#[test]
fn cleanup_is_a_single_pass() {
    // Removing the inner pair exposes the outer one; it stays until a
    // later run.
    assert_eq!(
        strip_empty_conditionals("if A_FLAG\nif B_FLAG\nendif\nendif\n"),
        "if A_FLAG\nendif\n"
    );
}

// --- mappack synthesis ---

fn test_fingerprint(name: &str) -> String {
    match name {
        "a.rms" => "AAAAAAAA".to_string(),
        "b.rms" => "BBBBBBBB".to_string(),
        other => format!("{:08X}", other.len()),
    }
}

fn entry(filename: &str, content: &str) -> MapEntry {
    MapEntry {
        filename: filename.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn two_map_pack() {
    let entries = vec![entry("a.rms", "CONTENT_A"), entry("b.rms", "CONTENT_B")];
    let document = mappack::synthesize(&entries, test_fingerprint).expect("synthesis failed");
    assert_eq!(
        document.to_string(),
        "start_random\n\
         percent_chance 50\n\
         #define MPAAAAAAAA_A\n\
         percent_chance 50\n\
         #define MPBBBBBBBB_B\n\
         end_random\n\
         if MPAAAAAAAA_A\n\
         CONTENT_A\n\
         elseif MPBBBBBBBB_B\n\
         CONTENT_B\n\
         endif\n"
    );
}

#[test]
fn pack_weights_sum_to_100_and_differ_by_at_most_one() {
    for n in 1..=12 {
        let entries: Vec<MapEntry> = (0..n)
            .map(|i| entry(&format!("map{}.rms", i), "X"))
            .collect();
        let document =
            mappack::synthesize(&entries, mappack::sha256_fingerprint).expect("synthesis failed");
        let Some(Node::Random(block)) = document.nodes.first() else {
            panic!("expected a random selector block");
        };
        let weights: Vec<u32> = block.branches.iter().map(|b| b.weight).collect();
        assert_eq!(weights.iter().sum::<u32>(), 100, "n = {}", n);
        let max = weights.iter().max().unwrap();
        let min = weights.iter().min().unwrap();
        assert!(max - min <= 1, "n = {}: {:?}", n, weights);
    }
}

#[test]
fn pack_symbols_are_sanitized() {
    let entries = vec![entry("my map #2!.rms", "X")];
    let document =
        mappack::synthesize(&entries, |_| "ab12cd34".to_string()).expect("synthesis failed");
    let Some(Node::Random(block)) = document.nodes.first() else {
        panic!("expected a random selector block");
    };
    assert_eq!(
        block.branches[0].body.nodes,
        vec![Node::Define("MPAB12CD34_MYMAP2".to_string())]
    );
}

#[test]
fn pack_with_no_maps_is_an_error() {
    let err = mappack::synthesize(&[], mappack::sha256_fingerprint)
        .expect_err("expected an error");
    assert!(matches!(err, ReduceError::NoMaps));
}

#[test]
fn sha256_fingerprint_is_stable() {
    let fp = mappack::sha256_fingerprint("arabia.rms");
    assert_eq!(fp.len(), 8);
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(fp, mappack::sha256_fingerprint("arabia.rms"));
    assert_ne!(fp, mappack::sha256_fingerprint("black_forest.rms"));
}

#[test]
fn pack_output_reduces_to_itself() {
    // A synthesized pack is already minimal: every selector branch is
    // below 100 and every dispatch symbol is defined by the selector.
    let entries = vec![entry("a.rms", "CONTENT_A"), entry("b.rms", "CONTENT_B")];
    let document = mappack::synthesize(&entries, test_fingerprint).expect("synthesis failed");
    let text = document.to_string();
    assert_eq!(reduced_text(&text), text.trim());
}
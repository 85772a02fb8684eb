use std::collections::BTreeSet;

use fsagen::{Automaton, EnvConfig, FsaEnv, NodeId, Variant};

fn seeded_env(config: EnvConfig) -> FsaEnv {
    FsaEnv::new(config).expect("env construction should succeed")
}

#[test]
fn first_step_leaves_preroll_for_start_node() {
    let mut env = seeded_env(EnvConfig {
        rng_seed: Some(7),
        ..EnvConfig::default()
    });
    env.init(0);

    assert_eq!(env.trial(), -1, "trial counter starts at the -1 sentinel");
    env.step();

    assert_eq!(env.current_node().index(), 0);
    assert_eq!(env.current_symbol().letter(), 'F');
    assert_eq!(env.trial(), 0, "first step must read trial 0");
    assert!(
        env.next_node().index() == 1 || env.next_node().index() == 2,
        "node 0 branches only to nodes 1 and 2, got {}",
        env.next_node()
    );
}

#[test]
fn walk_never_leaves_node_and_symbol_ranges() {
    let mut env = seeded_env(EnvConfig {
        rng_seed: Some(1234),
        ..EnvConfig::default()
    });
    env.init(0);

    for _ in 0..5_000 {
        env.step();
        assert!(env.next_node().index() < Automaton::NUM_NODES);
        assert!(env.current_node().index() < Automaton::NUM_NODES);
        assert!(env.next_symbol().code() < 9);
        assert!(env.current_symbol().code() < 9);
    }
    assert_eq!(env.trial(), 4_999);
}

#[test]
fn full_repeat_probability_traps_the_walk_in_repeat_branch() {
    let mut env = seeded_env(EnvConfig {
        repeat_prob: 1.0,
        rng_seed: Some(99),
        ..EnvConfig::default()
    });
    env.init(0);

    // Step 1 lands in node 0, step 2 commits to one of the two branches.
    env.step();
    env.step();
    let branch: BTreeSet<usize> = if env.current_node().index() == 1 {
        [1, 3].into()
    } else {
        assert_eq!(env.current_node().index(), 2);
        [2, 4].into()
    };

    for _ in 0..1_000 {
        env.step();
        let node = env.current_node().index();
        assert!(
            branch.contains(&node),
            "walk escaped the repeat branch to node {node}"
        );
        assert!(node != 5 && node != 6, "advance branch has zero probability");
    }
}

#[test]
fn zero_repeat_probability_cycles_through_the_advance_path() {
    let mut env = seeded_env(EnvConfig {
        repeat_prob: 0.0,
        rng_seed: Some(5),
        ..EnvConfig::default()
    });
    env.init(0);

    // With p = 0 the walk is 0 -> {1,2} -> {5,6} -> {7,8} -> 0 -> ...
    // so nodes 3 and 4 are unreachable and the cycle length is 4.
    for step in 0..2_000u64 {
        env.step();
        let node = env.current_node().index();
        assert!(node != 3 && node != 4, "repeat branch has zero probability");
        if step % 4 == 0 {
            assert_eq!(node, 0, "cycle of length 4 restarts at node 0");
        }
    }
}

#[test]
fn same_seed_produces_identical_node_streams() {
    let config = EnvConfig {
        rng_seed: Some(31337),
        ..EnvConfig::default()
    };
    let mut a = seeded_env(config.clone());
    let mut b = seeded_env(config);
    a.init(0);
    b.init(0);

    for _ in 0..500 {
        a.step();
        b.step();
        assert_eq!(a.current_node(), b.current_node());
        assert_eq!(a.next_node(), b.next_node());
        assert_eq!(a.current_symbol(), b.current_symbol());
        assert_eq!(a.next_symbol(), b.next_symbol());
    }
}

#[test]
fn reinit_restarts_the_walk_and_counter() {
    let mut env = seeded_env(EnvConfig {
        rng_seed: Some(8),
        ..EnvConfig::default()
    });
    env.init(0);
    for _ in 0..100 {
        env.step();
    }
    assert_eq!(env.trial(), 99);

    env.init(1);
    assert_eq!(env.run(), 1);
    assert_eq!(env.trial(), -1);
    assert_eq!(env.current_node(), Automaton::RESET_NODE);
    assert_eq!(env.next_node(), Automaton::START_NODE);
    assert_eq!(env.to_string(), "H_F_S7_rew_0");
}

#[test]
fn transition_rows_are_distributions_for_both_variants() {
    for variant in [Variant::Easy, Variant::Hard] {
        for i in 0..=4 {
            let p = f64::from(i) / 4.0;
            let automaton =
                Automaton::new(variant, p, 9).expect("automaton construction should succeed");
            for node in 0..Automaton::NUM_NODES {
                let sum: f64 = automaton
                    .transition_row(NodeId::new(node).unwrap())
                    .iter()
                    .sum();
                assert!(
                    (sum - 1.0).abs() < 1e-6,
                    "variant {variant:?} p {p} node {node}: row sums to {sum}"
                );
            }
        }
    }
}

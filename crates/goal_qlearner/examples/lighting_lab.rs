//! Lighting Lab Example
//!
//! A lab with two zones whose illuminance rank (0-3) is raised or lowered by
//! switching lights and moving blinds. The learner is trained for a target
//! `[z1, z2]` rank pair, then used greedily to steer the lab there.
//!
//! Run with: cargo run -p goal_qlearner --example lighting_lab

use goal_qlearner::{
    ActionIndex, ActionRecommendation, Environment, Error, Goal, LearnerConfig, QLearner, Result,
    StateDescription, StateIndex, TrainingConfig, Value,
};

const LEVELS: usize = 4;

const ACTIONS: [(&str, &str, bool); 4] = [
    ("http://example.org/was#SetZ1Light", "Z1Light", true),
    ("http://example.org/was#SetZ1Light", "Z1Light", false),
    ("http://example.org/was#SetZ2Light", "Z2Light", true),
    ("http://example.org/was#SetZ2Light", "Z2Light", false),
];

/// Simulated two-zone lab.
struct LightingLab {
    z1: usize,
    z2: usize,
}

impl LightingLab {
    fn new() -> Self {
        Self { z1: 0, z2: 0 }
    }

    fn place(&mut self, z1: usize, z2: usize) {
        self.z1 = z1;
        self.z2 = z2;
    }
}

impl Environment for LightingLab {
    fn state_count(&self) -> usize {
        LEVELS * LEVELS
    }

    fn action_count(&self) -> usize {
        ACTIONS.len()
    }

    fn goal_dimensions(&self) -> usize {
        2
    }

    fn applicable_actions(&self, state: StateIndex) -> Result<Vec<ActionIndex>> {
        if state >= self.state_count() {
            return Err(Error::state_out_of_range(state as i64, self.state_count()));
        }
        let (z1, z2) = (state / LEVELS, state % LEVELS);
        let mut actions = Vec::new();
        if z1 + 1 < LEVELS {
            actions.push(0);
        }
        if z1 > 0 {
            actions.push(1);
        }
        if z2 + 1 < LEVELS {
            actions.push(2);
        }
        if z2 > 0 {
            actions.push(3);
        }
        Ok(actions)
    }

    fn perform_action(&mut self, action: ActionIndex) -> Result<()> {
        match action {
            0 if self.z1 + 1 < LEVELS => self.z1 += 1,
            1 if self.z1 > 0 => self.z1 -= 1,
            2 if self.z2 + 1 < LEVELS => self.z2 += 1,
            3 if self.z2 > 0 => self.z2 -= 1,
            _ => {
                return Err(Error::EnvironmentFailure(format!(
                    "action {} rejected at levels [{}, {}]",
                    action, self.z1, self.z2
                )))
            }
        }
        Ok(())
    }

    fn current_state(&self) -> Result<StateIndex> {
        Ok(self.z1 * LEVELS + self.z2)
    }

    fn current_state_description(&self) -> Result<StateDescription> {
        Ok(vec![
            Value::Int(self.z1 as i64),
            Value::Int(self.z2 as i64),
            Value::Bool(self.z1 >= 2),
            Value::Bool(self.z2 >= 2),
        ])
    }

    fn describe_action(&self, action: ActionIndex) -> Result<ActionRecommendation> {
        let (tag, payload_tag, on) = ACTIONS
            .get(action)
            .ok_or_else(|| Error::action_out_of_range(action, ACTIONS.len()))?;
        Ok(ActionRecommendation::new(
            action,
            tag,
            vec![payload_tag.to_string()],
            vec![Value::Bool(*on)],
        ))
    }
}

fn main() -> Result<()> {
    println!("=== Lighting Lab Example ===\n");

    let config = LearnerConfig::new("lab").with_seed(2024);
    let mut learner = QLearner::with_config(LightingLab::new(), config);
    let goal = Goal::parse(&["2", "3"])?;
    let training = TrainingConfig::new(1, 0.5, 0.9, 0.3, 1.0).with_max_steps(Some(5_000));

    // Start every episode from a different corner of the lab.
    let starts = [(0, 0), (3, 0), (0, 3), (3, 3), (1, 1)];
    let mut steps = 0;
    for episode in 0..300 {
        let (z1, z2) = starts[episode % starts.len()];
        learner.environment_mut().place(z1, z2);
        steps += learner.calculate_q(&goal, &training)?.total_steps();
    }
    println!("Trained goal {} in {} steps\n", goal, steps);
    println!("{}", learner.dump_table(&goal)?);

    // Follow the greedy policy from a dark lab.
    learner.environment_mut().place(0, 0);
    for _ in 0..10 {
        let description = learner.environment().current_state_description()?;
        if description[0] == Value::Int(2) && description[1] == Value::Int(3) {
            println!("Reached {:?}", &description[..2]);
            break;
        }
        // The query reads the state index from the first field, which here is z1.
        let state = learner.environment().current_state()?;
        let recommendation = learner.get_action_from_state(&goal, &[Value::Int(state as i64)])?;
        println!(
            "levels {:?} -> {} {:?}={:?}",
            &description[..2],
            recommendation.tag,
            recommendation.payload_tags,
            recommendation.payload
        );
        learner
            .environment_mut()
            .perform_action(recommendation.action)?;
    }

    Ok(())
}

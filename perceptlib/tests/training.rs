use approx::assert_abs_diff_eq;

use perceptlib::prelude::*;

const TRAIN_INPUT: &str = "
# temperature, humidity
10, 80
12, 75
30, 20
33, 25
11, 90
31, 15
";

const TRAIN_OUTPUT: &str = "
# rain; sun
1; 0
1; 0
0; 1
0; 1
1; 0
0; 1
";

fn module() -> anyhow::Result<Module64> {
    let mut module = Module::new();

    module.build(&NetworkConfig::default()
        .with_dimensions([2, 6, 2])
        .with_activation(Activation::Tanh)
        .with_learning_rate(0.1)
        .with_seed(2024))?;

    module.set_train_input(parse_table(TRAIN_INPUT)?)?;
    module.set_train_output(parse_table(TRAIN_OUTPUT)?)?;

    module.set_test_input(parse_table("9, 85\n34, 10\n")?)?;
    module.set_test_output(parse_table("1, 0\n0, 1\n")?)?;

    Ok(module)
}

#[test]
/// Network learns to separate two well separated clusters.
fn test_classify_clusters() -> anyhow::Result<()> {
    let mut module = module()?;

    let losses = module.train_and_test(500)?;

    let (first_train, first_test) = losses[0];
    let (last_train, last_test) = losses[losses.len() - 1];

    assert!(last_train < first_train);
    assert!(last_test < first_test);

    let predictions = module.predict()?;

    assert!(predictions[0][0] > predictions[0][1]);
    assert!(predictions[1][1] > predictions[1][0]);

    Ok(())
}

#[test]
/// Same seed gives the same training history.
fn test_reproducible_training() -> anyhow::Result<()> {
    let mut a = module()?;
    let mut b = module()?;

    assert_eq!(a.train_for(20)?, b.train_for(20)?);
    assert_eq!(a.weights()?, b.weights()?);
    assert_eq!(a.biases()?, b.biases()?);

    Ok(())
}

#[test]
fn test_single_output_network() -> anyhow::Result<()> {
    let mut module = Module64::new();

    module.build(&NetworkConfig::default()
        .with_dimensions([2, 4, 1])
        .with_activation(Activation::Sigmoid)
        .with_learning_rate(0.5)
        .with_seed(9))?;

    module.set_train_input(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0]
    ])?;

    // Single column outputs are used as is.
    module.set_train_output(vec![vec![0.0], vec![0.0], vec![1.0], vec![1.0]])?;

    let losses = module.train_for(300)?;

    assert!(losses[299] < losses[0]);

    for prediction in module.predict_data(&[vec![0.0, 0.5], vec![1.0, 0.5]])? {
        assert_eq!(prediction.len(), 1);
        assert!(prediction[0] > 0.0 && prediction[0] < 1.0);
    }

    Ok(())
}

#[test]
/// Network with single precision floats gives the same forward pass.
fn test_single_precision_forward_pass() -> anyhow::Result<()> {
    let l1 = HiddenLayer32::new(vec![
        Neuron::new(vec![-0.1, 0.2], 0.1),
        Neuron::new(vec![0.2, -0.1], -0.2)
    ], Activation::Sigmoid)?;

    let l2 = HiddenLayer32::new(vec![
        Neuron::new(vec![-0.05, -0.2], -0.3),
        Neuron::new(vec![-0.05, -0.3], 0.2),
        Neuron::new(vec![-0.1, -0.7], 0.5)
    ], Activation::Tanh)?;

    let l3 = OutputLayer32::new(vec![
        Neuron::new(vec![0.5, -0.2, -0.1], -0.3),
        Neuron::new(vec![-0.05, -0.3, 0.4], 0.2)
    ])?;

    let network = Network32::new(vec![l1, l2], l3, 0.3, Loss::Sse)?;

    let prediction = network.predict(&[1.0, 0.0]);

    assert_abs_diff_eq!(prediction[0], 0.316_920_9, epsilon = 1e-5);
    assert_abs_diff_eq!(prediction[1], 0.683_079_1, epsilon = 1e-5);

    Ok(())
}

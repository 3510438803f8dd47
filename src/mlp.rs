//! Feed-forward value function approximator.
//!
//! Maps an observation vector to one Q-value per action. Each instance owns
//! its parameters through a [`VarMap`], which makes wholesale weight copies
//! (target network syncs) and safetensors persistence straightforward.

use std::path::Path;

use candle_core::{DType, Tensor, Var};
use candle_nn::{Linear, Module, VarBuilder, VarMap, linear};

use crate::device::DEVICE;
use crate::error::Result;

pub struct MultiLayerPerceptron {
    layers: Vec<Linear>,
    var_map: VarMap,
    topology: Vec<usize>,
}

impl MultiLayerPerceptron {
    /// Builds a fresh network with randomly initialized parameters.
    ///
    /// `topology` lists the layer widths from input to output and must hold
    /// at least two entries.
    pub fn new(topology: &[usize]) -> Result<Self> {
        assert!(topology.len() >= 2, "topology needs input and output widths");

        let var_map = VarMap::new();
        let vb = VarBuilder::from_varmap(&var_map, DType::F32, &DEVICE);
        let mut layers = Vec::with_capacity(topology.len() - 1);
        for i in 0..topology.len() - 1 {
            layers.push(linear(topology[i], topology[i + 1], vb.pp(i))?);
        }

        Ok(Self {
            layers,
            var_map,
            topology: topology.to_vec(),
        })
    }

    /// Forward pass: ReLU on every hidden layer, linear output.
    pub fn forward(&self, inputs: &Tensor) -> Result<Tensor> {
        let mut x = inputs.clone();
        for layer in self.layers.iter().take(self.layers.len() - 1) {
            x = layer.forward(&x)?.relu()?;
        }
        if let Some(last) = self.layers.last() {
            x = last.forward(&x)?;
        }
        Ok(x)
    }

    /// Overwrites this network's parameters with a deep copy of `source`'s.
    ///
    /// Both networks must share a topology; variables are matched by name.
    pub fn copy_weights_from(&self, source: &Self) -> Result<()> {
        let source_vars = source.var_map.data().lock().unwrap();
        let own_vars = self.var_map.data().lock().unwrap();
        for (name, source_var) in source_vars.iter() {
            if let Some(own_var) = own_vars.get(name) {
                own_var.set(&source_var.as_tensor().detach())?;
            }
        }
        Ok(())
    }

    /// All trainable variables, in the form the optimiser expects.
    pub fn all_vars(&self) -> Vec<Var> {
        self.var_map.all_vars()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.var_map.save(path)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.var_map.load(path)?;
        Ok(())
    }

    pub fn topology(&self) -> &[usize] {
        &self.topology
    }
}

//! Per-backend model cache.

use std::collections::HashMap;

use burn::tensor::backend::Backend;

use crate::config::ModelConfig;
use crate::deploy::DeployRunner;
use crate::error::Result;
use crate::inference::Inference;
use crate::network::{SegmentationModel, SegmentationNetwork};
use crate::source::ModelSource;

/// Builds the inference backend for one [`ModelSource`].
pub type ModelLoader<B> = Box<dyn FnMut(ModelSource) -> Result<Box<dyn Inference<B>>>>;

/// Loads each backend at most once and hands out the loaded model afterwards.
pub struct ModelCache<B: Backend> {
    loader: ModelLoader<B>,
    models: HashMap<ModelSource, Box<dyn Inference<B>>>,
}

impl<B: Backend> std::fmt::Debug for ModelCache<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut loaded: Vec<_> = self.models.keys().collect();
        loaded.sort();
        f.debug_struct("ModelCache").field("loaded", &loaded).finish()
    }
}

impl<B: Backend> ModelCache<B> {
    pub fn new(loader: impl FnMut(ModelSource) -> Result<Box<dyn Inference<B>>> + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            models: HashMap::new(),
        }
    }

    /// Cache whose deploy backends run [`DeployRunner`] and whose local
    /// backend wraps the network returned by `load_network`.
    pub fn from_config<N>(
        config: ModelConfig,
        mut load_network: impl FnMut(&ModelConfig) -> Result<N> + 'static,
    ) -> Self
    where
        B: 'static,
        N: SegmentationNetwork<B> + 'static,
    {
        Self::new(move |source| -> Result<Box<dyn Inference<B>>> {
            match source {
                ModelSource::LocalWeights => {
                    let network = load_network(&config)?;
                    Ok(Box::new(SegmentationModel::new(network, &config)))
                }
                ModelSource::LocalDeploy | ModelSource::DockerDeploy => {
                    Ok(Box::new(DeployRunner::from_config(source, &config)?))
                }
            }
        })
    }

    /// Model for `source`, loading it on first use.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&mut self, source: ModelSource) -> Result<&dyn Inference<B>> {
        if !self.models.contains_key(&source) {
            tracing::info!(backend = %source, "loading segmentation model");
            let model = (self.loader)(source)?;
            self.models.insert(source, model);
        }
        self.models
            .get(&source)
            .map(|model| model.as_ref())
            .ok_or_else(|| crate::error::ModelError::not_loaded(source.description()))
    }

    pub fn is_loaded(&self, source: ModelSource) -> bool {
        self.models.contains_key(&source)
    }

    pub fn loaded_count(&self) -> usize {
        self.models.len()
    }

    /// Drop a loaded model so the next request reloads it.
    pub fn evict(&mut self, source: ModelSource) -> bool {
        self.models.remove(&source).is_some()
    }
}
